//! Hints suggesting the next command.

/// After a consistency failure.
pub fn run_generate() -> &'static str {
    "Run `monodeps generate` to refresh the temp modules."
}

/// After an installer failure.
pub fn retry_install(attempts: u32) -> String {
    format!(
        "The installer failed {} time(s). Fix the error above, then run `monodeps install`.",
        attempts
    )
}

/// After `status` finds the installed tree out of date.
pub fn install_needed() -> &'static str {
    "Run `monodeps install` to bring installed dependencies up to date."
}
