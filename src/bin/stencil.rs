//! Command-line interface for stencil
//! This binary is used to tokenize template files and verify that the token
//! stream losslessly reconstructs its source.
//!
//! Usage:
//!   stencil tokens `<path>` [--pretty] [--no-markup] [--no-dynamic] [--no-inline] [--host-code]  - Dump the token stream as JSON
//!   stencil check `<path>` [--host-code]                                                         - Verify the stream reconstructs the source

use clap::{Arg, ArgAction, Command};

use stencil::{
    detokenize, DynamicGrammar, HostCodeGrammar, InlineGrammar, Lexer, MarkupGrammar, Token,
};

fn main() {
    let grammar_args = [
        Arg::new("no-markup")
            .long("no-markup")
            .help("Disable the markup tag grammar")
            .action(ArgAction::SetTrue),
        Arg::new("no-dynamic")
            .long("no-dynamic")
            .help("Disable the echo and directive grammar")
            .action(ArgAction::SetTrue),
        Arg::new("no-inline")
            .long("no-inline")
            .help("Disable the inline placeholder grammar")
            .action(ArgAction::SetTrue),
        Arg::new("host-code")
            .long("host-code")
            .help("Enable the embedded host-code grammar")
            .action(ArgAction::SetTrue),
    ];

    let matches = Command::new("stencil")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for tokenizing and checking template files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokens")
                .about("Dump the token stream as JSON")
                .arg(
                    Arg::new("path")
                        .help("Path to the template file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .help("Pretty-print the JSON output")
                        .action(ArgAction::SetTrue),
                )
                .args(grammar_args.clone()),
        )
        .subcommand(
            Command::new("check")
                .about("Verify the token stream reconstructs the source")
                .arg(
                    Arg::new("path")
                        .help("Path to the template file")
                        .required(true)
                        .index(1),
                )
                .args(grammar_args),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("tokens", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let pretty = sub.get_flag("pretty");
            let tokens = tokenize_file(path, sub);
            handle_tokens_command(&tokens, pretty);
        }
        Some(("check", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let tokens = tokenize_file(path, sub);
            handle_check_command(path, &tokens);
        }
        _ => unreachable!(),
    }
}

/// Build a lexer from the grammar selection flags and run it over the file.
fn tokenize_file(path: &str, sub: &clap::ArgMatches) -> Vec<Token> {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });

    let mut lexer = Lexer::new();
    if sub.get_flag("host-code") {
        lexer.add_grammar(HostCodeGrammar::new());
    }
    if !sub.get_flag("no-dynamic") {
        lexer.add_grammar(DynamicGrammar::new());
    }
    if !sub.get_flag("no-inline") {
        lexer.add_grammar(InlineGrammar);
    }
    if !sub.get_flag("no-markup") {
        lexer.add_grammar(MarkupGrammar::new());
    }

    lexer.parse(&source).unwrap_or_else(|e| {
        eprintln!("Lexing error: {}", e);
        std::process::exit(1);
    })
}

/// Handle the tokens command
fn handle_tokens_command(tokens: &[Token], pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(tokens)
    } else {
        serde_json::to_string(tokens)
    };
    match json {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the check command
fn handle_check_command(path: &str, tokens: &[Token]) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });

    if detokenize(tokens) == source {
        println!("ok: {} tokens reconstruct the source exactly", tokens.len());
    } else {
        eprintln!("mismatch: token stream does not reconstruct the source");
        std::process::exit(1);
    }
}
