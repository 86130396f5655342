use std::{env, fs};

use szymczak_format::{parse_with, ParseOptions, Revision};

const USAGE: &str = "usage: szymczak_parse [--revision classes|witnesses] <file>";

fn usage() -> ! {
    eprintln!("{USAGE}");
    std::process::exit(2);
}

fn main() {
    let mut options = ParseOptions::default();
    let mut path = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--revision" {
            let Some(value) = args.next() else { usage() };
            match value.parse::<Revision>() {
                Ok(revision) => options.revision = Some(revision),
                Err(err) => {
                    eprintln!("{err}");
                    usage();
                }
            }
        } else if path.is_none() {
            path = Some(arg);
        } else {
            usage();
        }
    }
    let Some(path) = path else { usage() };

    let text = match fs::read_to_string(&path) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("failed to read `{path}`: {err}");
            std::process::exit(2);
        }
    };

    match parse_with(&text, &options) {
        Ok(output) => {
            let detected = if options.revision.is_some() { "" } else { ", detected" };
            println!(
                "ok({}{detected}): functor={} object={} classes={} relations={}",
                output.revision(),
                output.preamble.functor_name,
                output.object_kind,
                output.classes.len(),
                output.classes.relation_count()
            );
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
