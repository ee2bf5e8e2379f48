pub mod view_api;
