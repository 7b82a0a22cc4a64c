/// phrases google serves instead of results once it thinks we are a bot
pub const BLOCK_SIGNATURES: [&str; 3] = [
    "This page appears when Google automatically detects requests coming from your computer network",
    "http://www.google.com/sorry/index",
    "https://www.google.com/sorry/index",
];

/// case sensitive, any signature on any line flags the whole body
pub fn is_blocked(body: &str) -> bool {
    body.trim()
        .lines()
        .any(|line| BLOCK_SIGNATURES.iter().any(|sig| line.contains(sig)))
}
