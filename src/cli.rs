//! Command-line interface for the javapp translator.
//!
//! `javapp FILE...` converts each Java++ file to a `.java` file next to it;
//! `--out` redirects (one per input, `STDOUT`/`NUL` special), `--parse`
//! runs a single named production over the arguments instead of a whole
//! compilation unit, and `-e`/`-d` pre-set features before any directives
//! in the source take over.

use clap::{Parser as ClapParser, ValueEnum};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::SyntaxError;
use crate::features::Features;
use crate::parser::{
    DeclarationParsing, ExpressionParsing, ImportParsing, Parser, StatementParsing, TypeParsing,
};
use crate::Lexer;

#[derive(ClapParser)]
#[command(name = "javapp")]
#[command(about = "Translate Java++ sources to plain Java", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The file(s) to parse. The special name "STDIN" reads from the
    /// console.
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// What syntax to use.
    #[arg(long = "type", value_enum, default_value = "Java++")]
    pub dialect: Dialect,

    /// Where to save the output. "STDOUT" prints to the console, "NUL"
    /// discards it. Repeatable for multiple input files.
    #[arg(long = "out", value_name = "FILE")]
    pub out: Vec<String>,

    /// Parse the arguments with this production instead of converting
    /// files.
    #[arg(long = "parse", value_name = "PARSE_METHOD")]
    pub parse: Option<String>,

    /// Enable the specified comma-separated features by default.
    #[arg(short = 'e', long = "enable", value_name = "FEATURES")]
    pub enable: Vec<String>,

    /// Disable the specified comma-separated features by default.
    #[arg(short = 'd', long = "disable", value_name = "FEATURES")]
    pub disable: Vec<String>,

    /// Print the supported feature names for -e and -d and exit.
    #[arg(long)]
    pub list_features: bool,

    /// Print the valid arguments to the --parse option and exit.
    #[arg(long)]
    pub list_parse_methods: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    #[value(name = "Java")]
    Java,
    #[value(name = "Java++")]
    JavaPlusPlus,
}

type ParseMethod = fn(&mut Parser) -> Result<String, SyntaxError>;

/// Named productions reachable from `--parse`. Rust has no reflection; the
/// table is the contract.
pub const PARSE_METHODS: &[(&str, ParseMethod)] = &[
    ("annotation", |p| {
        p.parse_annotation().map(|a| a.to_string())
    }),
    ("block", |p| {
        p.parse_block().map(|stmts| {
            stmts
                .iter()
                .map(|s| s.to_string())
                .collect::<String>()
        })
    }),
    ("compilation_unit", |p| {
        p.parse_compilation_unit().map(|u| u.to_string())
    }),
    ("expression", |p| {
        p.parse_expression().map(|e| e.to_string())
    }),
    ("import_section", |p| {
        p.parse_import_section(&[]).map(|imports| {
            imports
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        })
    }),
    ("literal", |p| p.parse_primary().map(|e| e.to_string())),
    ("modifiers", |p| {
        p.parse_modifiers_and_annotations().map(|(mods, annos)| {
            let mut words: Vec<String> = annos.iter().map(|a| a.to_string()).collect();
            words.extend(mods.iter().map(|m| m.0.clone()));
            words.join(" ")
        })
    }),
    ("parameters", |p| {
        p.parse_parameters().map(|(this_param, params)| {
            let mut rendered: Vec<String> = Vec::new();
            if let Some(this_param) = this_param {
                let mut s = String::new();
                for a in &this_param.annotations {
                    s.push_str(&a.to_string());
                    s.push(' ');
                }
                s.push_str(&this_param.r#type.to_string());
                s.push(' ');
                if let Some(qualifier) = &this_param.qualifier {
                    s.push_str(qualifier);
                    s.push('.');
                }
                s.push_str("this");
                rendered.push(s);
            }
            rendered.extend(params.iter().map(|p| p.to_string()));
            format!("({})", rendered.join(", "))
        })
    }),
    ("statement", |p| p.parse_statement().map(|s| s.to_string())),
    ("type", |p| p.parse_type().map(|t| t.to_string())),
    ("type_declaration", |p| {
        p.parse_type_declaration().map(|d| d.to_string())
    }),
];

pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.list_parse_methods {
        for (name, _) in PARSE_METHODS {
            println!("{}", name);
        }
        return Ok(());
    }

    if cli.list_features {
        let mut names: Vec<&str> = Features::names().collect();
        names.sort_unstable();
        for name in names {
            println!("{}", name);
        }
        println!();
        println!("Use a \".*\" at the end of a namespace to use everything from that namespace.");
        println!("A \"*\" by itself means \"use every feature\".");
        return Ok(());
    }

    if cli.dialect == Dialect::Java {
        if !cli.enable.is_empty() {
            return Err("-e is only allowed for --type=Java++".into());
        }
        if !cli.disable.is_empty() {
            return Err("-d is only allowed for --type=Java++".into());
        }
    }

    let mut features = match cli.dialect {
        Dialect::Java => Features::java(),
        Dialect::JavaPlusPlus => Features::java_plus_plus(),
    };
    for name in cli.enable.iter().flat_map(|s| s.split(',')) {
        features
            .set(name.trim(), true)
            .map_err(|e| e.to_string())?;
    }
    for name in cli.disable.iter().flat_map(|s| s.split(',')) {
        features
            .set(name.trim(), false)
            .map_err(|e| e.to_string())?;
    }

    if let Some(method) = &cli.parse {
        return run_parse_method(&cli, method, features);
    }

    if cli.files.is_empty() {
        return Err("the following arguments are required: FILES".into());
    }

    let from_stdin = cli.files.len() == 1 && cli.files[0] == "STDIN";
    if !from_stdin && cli.files.iter().any(|f| f == "STDIN") {
        return Err(
            "STDIN can only be used as an input file if there are no other input files".into(),
        );
    }
    if !cli.out.is_empty() && cli.out.len() != cli.files.len() {
        return Err("number of output files is not the same as number of input files".into());
    }

    for (index, file) in cli.files.iter().enumerate() {
        let (source, display_name) = if from_stdin {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            (buf, "<stdin>".to_string())
        } else {
            (fs::read_to_string(file)?, file.clone())
        };

        let unit = parse_unit(&source, &display_name, features.clone())?;
        let rendered = unit.to_string();

        let destination = cli.out.get(index).cloned();
        match destination.as_deref() {
            Some("NUL") => {}
            Some("STDOUT") => print!("{}", rendered),
            Some(path) => {
                fs::write(path, &rendered)?;
                println!("Converted {}", path);
            }
            None if from_stdin => print!("{}", rendered),
            None => {
                let path = Path::new(file).with_extension("java");
                fs::write(&path, &rendered)?;
                println!("Converted {}", path.display());
            }
        }
    }
    Ok(())
}

fn parse_unit(
    source: &str,
    filename: &str,
    features: Features,
) -> Result<crate::ast::CompilationUnit, Box<dyn std::error::Error>> {
    let tokens = Lexer::tokenize(source)
        .map_err(|e| e.display_with_source(filename, source))?;
    let mut parser = Parser::new(tokens, features);
    parser
        .parse_compilation_unit()
        .map_err(|e| e.display_with_source(filename, source).into())
}

fn run_parse_method(
    cli: &Cli,
    method: &str,
    features: Features,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some((_, parse_fn)) = PARSE_METHODS.iter().find(|(name, _)| name == &method) else {
        return Err(format!("invalid option for --parse: {}", method).into());
    };

    let (source, display_name) = if cli.files.is_empty()
        || (cli.files.len() == 1 && cli.files[0] == "STDIN")
    {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        (buf, "<stdin>".to_string())
    } else if cli.files.iter().any(|f| f == "STDIN") {
        return Err(
            "STDIN can only be used as an input file if there are no other input files".into(),
        );
    } else {
        (cli.files.join(" "), "<string>".to_string())
    };

    let tokens = Lexer::tokenize(&source)
        .map_err(|e| e.display_with_source(&display_name, &source))?;
    let mut parser = Parser::new(tokens, features);
    let rendered = parse_fn(&mut parser)
        .map_err(|e| e.display_with_source(&display_name, &source))?;

    if cli.out.len() > 1 {
        return Err(format!("unrecognized arguments: {}", cli.out[1..].join(" ")).into());
    }
    match cli.out.first().map(String::as_str) {
        Some("NUL") => {}
        Some("STDOUT") | None => println!("{}", rendered),
        Some(path) => {
            fs::write(PathBuf::from(path), format!("{}\n", rendered))?;
            println!("Wrote to {}", path);
        }
    }
    Ok(())
}
