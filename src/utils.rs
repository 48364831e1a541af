use rand::{distributions::Alphanumeric, thread_rng, Rng};

pub const DEFAULT_CODE_LENGTH: usize = 6;

// random code drawn uniformly from [a-zA-Z0-9]; uniqueness is the caller's job
pub fn generate_short_code(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

// checking validity of the long url
pub fn valid_url(url: &str) -> bool {
    url::Url::parse(url).is_ok()
}
