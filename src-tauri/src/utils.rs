use rand::Rng;

/// Случайный id для корреляции запросов
pub fn random_id() -> String {
    hex::encode(rand::rng().random::<[u8; 8]>())
}
