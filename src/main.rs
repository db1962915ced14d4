use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tree_pattern::config::{load_for_grammar, scan, MatchSummary, RuleReport};
use tree_pattern::grammar::expr::{self, ExprLexer, ExprParser, ExprVocabulary};
use tree_pattern::pattern::{Chunk, Delimiters, ParseTreeMatch, ParseTreePatternMatcher};
use tree_pattern::tree::trees;
use tree_pattern::{ParseTree, Vocabulary, XPath};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "tree-pattern")]
#[command(about = "Match tree patterns and path queries against parse trees", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Input {
    /// Source file to read
    #[arg(required_unless_present = "expr", conflicts_with = "expr")]
    file: Option<PathBuf>,

    /// Use this text instead of a file
    #[arg(short, long)]
    expr: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a pattern into text and tag chunks
    Split {
        pattern: String,

        #[arg(long, default_value = "<")]
        start: String,

        #[arg(long, default_value = ">")]
        stop: String,

        #[arg(long, default_value = "\\")]
        escape: String,

        #[arg(long)]
        json: bool,
    },

    /// Print the parse tree of the input
    Tree {
        /// Start rule
        #[arg(short, long, default_value = "prog")]
        rule: String,

        #[command(flatten)]
        input: Input,
    },

    /// Match a pattern against the whole input
    Match {
        #[arg(short, long)]
        pattern: String,

        /// Rule the pattern and the input are parsed as
        #[arg(short, long, default_value = "stat")]
        rule: String,

        #[arg(long)]
        json: bool,

        #[command(flatten)]
        input: Input,
    },

    /// Select nodes of a program with a path query
    Xpath {
        /// Path such as //func/body//ID
        #[arg(short, long)]
        path: String,

        /// Rule the input is parsed as
        #[arg(long, default_value = "prog")]
        input_rule: String,

        #[arg(long)]
        json: bool,

        #[command(flatten)]
        input: Input,
    },

    /// Find every subtree selected by a path that matches a pattern
    Find {
        #[arg(short, long)]
        pattern: String,

        /// Rule the pattern is parsed as
        #[arg(short, long, default_value = "stat")]
        rule: String,

        /// Path selecting candidate subtrees (defaults to //<rule>)
        #[arg(long)]
        path: Option<String>,

        /// Rule the input is parsed as
        #[arg(long, default_value = "prog")]
        input_rule: String,

        #[arg(long)]
        json: bool,

        #[command(flatten)]
        input: Input,
    },

    /// Run a TOML rule file over source files and directories
    Scan {
        #[arg(short, long)]
        config: PathBuf,

        /// Files, or directories searched for .expr files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tree_pattern::init_tracing(cli.verbose);

    match cli.command {
        Commands::Split {
            pattern,
            start,
            stop,
            escape,
            json,
        } => cmd_split(&pattern, Delimiters::new(start, stop, escape)?, json),

        Commands::Tree { rule, input } => cmd_tree(&rule, &input),

        Commands::Match {
            pattern,
            rule,
            json,
            input,
        } => cmd_match(&pattern, &rule, json, &input),

        Commands::Xpath {
            path,
            input_rule,
            json,
            input,
        } => cmd_xpath(&path, &input_rule, json, &input),

        Commands::Find {
            pattern,
            rule,
            path,
            input_rule,
            json,
            input,
        } => {
            let path = path.unwrap_or_else(|| format!("//{rule}"));
            cmd_find(&pattern, &rule, &path, &input_rule, json, &input)
        }

        Commands::Scan {
            config,
            paths,
            json,
        } => cmd_scan(&config, &paths, json),
    }
}

fn read_input(input: &Input) -> Result<String> {
    match (&input.expr, &input.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        (None, None) => anyhow::bail!("no input: pass a file or --expr"),
    }
}

fn parse_input(input: &Input, rule: &str) -> Result<ParseTree> {
    let source = read_input(input)?;
    expr::parse_source(&source, rule).with_context(|| format!("failed to parse input as '{rule}'"))
}

fn rule_index(rule: &str) -> Result<usize> {
    ExprVocabulary::new()
        .rule_index(rule)
        .with_context(|| format!("unknown rule '{rule}'"))
}

fn matcher() -> ParseTreePatternMatcher<ExprLexer, ExprParser> {
    ParseTreePatternMatcher::new(ExprLexer::new(), ExprParser::new())
}

fn cmd_split(pattern: &str, delimiters: Delimiters, json: bool) -> Result<()> {
    let chunks = delimiters.split(pattern)?;

    if json {
        let out: Vec<_> = chunks
            .iter()
            .map(|chunk| match chunk {
                Chunk::Text(text) => json!({ "kind": "text", "text": text.text() }),
                Chunk::Tag(tag) => json!({ "kind": "tag", "tag": tag.tag(), "label": tag.label() }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for chunk in &chunks {
        match chunk {
            Chunk::Text(_) => println!("{} {}", "text".dimmed(), chunk),
            Chunk::Tag(_) => println!("{}  {}", "tag".cyan(), chunk),
        }
    }
    Ok(())
}

fn cmd_tree(rule: &str, input: &Input) -> Result<()> {
    let tree = parse_input(input, rule)?;
    println!("{}", trees::to_string_tree(tree.root(), &ExprVocabulary::new()));
    Ok(())
}

fn cmd_match(pattern: &str, rule: &str, json: bool, input: &Input) -> Result<()> {
    let index = rule_index(rule)?;
    let tree = parse_input(input, rule)?;
    let result = matcher().match_pattern(tree.root(), pattern, index)?;

    if json {
        let summary = MatchSummary::from_match(&result);
        let out = json!({
            "succeeded": result.succeeded(),
            "mismatched": result.mismatched_node().map(|n| n.text()),
            "labels": summary.labels,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if result.succeeded() {
        println!("{} {}", "✓".green(), result);
        print_labels(&result);
    } else {
        let node = result.mismatched_node().map(|n| n.text()).unwrap_or_default();
        println!("{} {}", "✗".red(), result);
        println!("  mismatch at '{}'", node.yellow());
    }

    if !result.succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_xpath(path: &str, input_rule: &str, json: bool, input: &Input) -> Result<()> {
    let tree = parse_input(input, input_rule)?;
    let vocabulary = ExprVocabulary::new();
    let nodes = XPath::find_all(tree.root(), path, &vocabulary)?;

    if json {
        let out: Vec<_> = nodes
            .iter()
            .map(|n| json!({ "node": trees::node_text(*n, &vocabulary), "text": n.text() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for node in &nodes {
        println!("{}", trees::to_string_tree(*node, &vocabulary));
    }
    Ok(())
}

fn cmd_find(
    pattern: &str,
    rule: &str,
    path: &str,
    input_rule: &str,
    json: bool,
    input: &Input,
) -> Result<()> {
    let index = rule_index(rule)?;
    let tree = parse_input(input, input_rule)?;
    let found = matcher().find_all(tree.root(), pattern, index, path)?;

    if json {
        let out: Vec<_> = found.iter().map(MatchSummary::from_match).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for m in &found {
        let summary = MatchSummary::from_match(m);
        println!(
            "{} {}",
            format!("{}:{}", summary.line, summary.column).dimmed(),
            summary.text.bold()
        );
        print_labels(m);
    }
    println!("{} matches", found.len());
    Ok(())
}

fn print_labels(m: &ParseTreeMatch<'_>) {
    for (label, nodes) in m.labels().iter() {
        let texts: Vec<_> = nodes.iter().map(|n| n.text()).collect();
        println!("  {} = {}", label.cyan(), texts.join(", "));
    }
}

fn cmd_scan(config_path: &Path, paths: &[PathBuf], json: bool) -> Result<()> {
    let config = load_for_grammar(config_path, &ExprVocabulary::new())?;
    let mut matcher = matcher();
    let mut results = Vec::new();
    let mut failures = 0;

    for file in collect_sources(paths)? {
        let source = fs::read_to_string(&file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let tree = match expr::parse_source(&source, "prog") {
            Ok(tree) => tree,
            Err(err) => {
                failures += 1;
                eprintln!("{} {}: {}", "✗".red(), file.display(), err);
                continue;
            }
        };
        let reports = scan(&config, &mut matcher, tree.root())?;
        failures += reports.iter().filter(|r| !r.succeeded()).count();
        results.push((file, reports));
    }

    if json {
        let out: Vec<_> = results
            .iter()
            .map(|(file, reports)| json!({ "file": file.display().to_string(), "rules": reports }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (file, reports) in &results {
            print_reports(file, reports);
        }
        let total: usize = results
            .iter()
            .flat_map(|(_, reports)| reports)
            .map(|r| r.matches.len())
            .sum();
        println!("{}", "Summary:".bold());
        println!("  {} files", results.len());
        println!("  {} matches", format!("{total}").green());
        println!("  {} failed", format!("{failures}").red());
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_reports(file: &Path, reports: &[RuleReport]) {
    println!("{}", file.display().to_string().bold());
    for report in reports {
        match &report.error {
            Some(err) => println!("  {} {}: {}", "✗".red(), report.id, err),
            None => {
                println!("  {} {}: {} matches", "✓".green(), report.id, report.matches.len());
                for m in &report.matches {
                    println!("    {}:{} {}", m.line, m.column, m.text);
                }
            }
        }
    }
}

/// Expand directories to the `.expr` files below them, sorted.
fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.exists() {
            anyhow::bail!("no such file or directory: {}", path.display());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry.path().extension().and_then(|s| s.to_str()) == Some("expr")
            {
                found.push(entry.path().to_path_buf());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}
