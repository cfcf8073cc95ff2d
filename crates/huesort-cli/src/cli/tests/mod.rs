//! CLI parse tests.

use super::Cli;
use clap::Parser;
use std::path::Path;

pub(super) fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_path() {
    let cli = parse(&["huesort", "/home/me/watchlist.csv"]);
    assert_eq!(cli.film_list_csv, Path::new("/home/me/watchlist.csv"));
    assert!(!cli.verbose);
}

#[test]
fn cli_parse_path_with_spaces_and_unicode() {
    let cli = parse(&["huesort", "/home/me/Films à voir/list.csv"]);
    assert_eq!(cli.film_list_csv, Path::new("/home/me/Films à voir/list.csv"));
}

#[test]
fn cli_parse_verbose() {
    let cli = parse(&["huesort", "--verbose", "/tmp/list.csv"]);
    assert!(cli.verbose);
    let cli = parse(&["huesort", "/tmp/list.csv", "-v"]);
    assert!(cli.verbose);
}

#[test]
fn cli_requires_exactly_one_path() {
    assert!(Cli::try_parse_from(["huesort"]).is_err());
    assert!(Cli::try_parse_from(["huesort", "/a.csv", "/b.csv"]).is_err());
}
