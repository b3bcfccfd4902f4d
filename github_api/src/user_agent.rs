/// User agent sent with every request. The API rejects requests without one.
pub fn get_user_agent() -> &'static str {
    concat!("github_api/", env!("CARGO_PKG_VERSION"))
}
