use super::*;
use clap::CommandFactory;

#[test]
fn cli_definition_is_consistent() {
    Args::command().debug_assert();
}

#[test]
fn chat_is_the_default_and_flags_are_global() {
    let args = Args::try_parse_from(["oai", "--access", "legacy", "-m", "gpt-x"]).unwrap();
    assert!(args.command.is_none());
    assert_eq!(args.access, Some(AccessTier::Legacy));
    assert_eq!(args.model.as_deref(), Some("gpt-x"));

    let args =
        Args::try_parse_from(["oai", "chat", "--serve", "--listen", "0.0.0.0:9000"]).unwrap();
    assert!(matches!(args.command, Some(Commands::Chat { serve: true })));
    assert_eq!(args.listen.as_deref(), Some("0.0.0.0:9000"));
}

#[test]
fn unknown_access_tier_is_rejected() {
    assert!(Args::try_parse_from(["oai", "--access", "alpha"]).is_err());
}

#[test]
fn image_arguments_are_validated() {
    let args = Args::try_parse_from([
        "oai", "image", "--prompt", "a cat", "-o", "cat.png", "--size", "512", "-n", "2",
    ])
    .unwrap();
    match args.command {
        Some(Commands::Image { prompt, output, size, num }) => {
            assert_eq!(prompt, "a cat");
            assert_eq!(output, PathBuf::from("cat.png"));
            assert_eq!(size, "512");
            assert_eq!(num, 2);
        }
        _ => panic!("expected image command"),
    }

    let image = ["oai", "image", "--prompt", "x", "-o", "x.png"];
    for extra in [["--size", "300"], ["-n", "0"], ["-n", "11"]] {
        let argv: Vec<&str> = image.iter().chain(&extra).copied().collect();
        assert!(Args::try_parse_from(argv).is_err(), "{extra:?}");
    }
}

#[test]
fn set_joins_multi_word_values() {
    let args = Args::try_parse_from(["oai", "set", "system-directive", "Be", "brief."]).unwrap();
    match args.command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key.as_deref(), Some("system-directive"));
            assert_eq!(value.join(" "), "Be brief.");
        }
        _ => panic!("expected set command"),
    }
}
