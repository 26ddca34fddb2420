//! Library integration tests.

use monodeps::MonodepsError;

#[test]
fn error_types_are_public() {
    let err = MonodepsError::MissingTempModule {
        project: "@acme/app".into(),
    };
    assert!(err.to_string().contains("@acme/app"));
    assert!(err.requires_regeneration());
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> monodeps::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use monodeps::cli::{Cli, Commands};

    let cli = Cli::parse_from(["monodeps", "status", "--json"]);
    if let Commands::Status(args) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Status command");
    }
}

#[test]
fn range_satisfaction_is_public() {
    use monodeps::lockfile::satisfies;

    assert!(satisfies("1.2.5", "^1.2.0"));
    assert!(!satisfies("1.1.0", "^1.2.0"));
}
