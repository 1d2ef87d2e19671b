//! Dockerfile instruction parser.
//!
//! Parses the copy-style subset of Dockerfile instructions the source-path
//! mapper consumes: `COPY` and `ADD`, in both shell and JSON-array form,
//! with line continuations. Everything else is recognized only by keyword.

use nom::{
    IResult,
    bytes::complete::take_while1,
    character::complete::space0,
    sequence::terminated,
};

/// Operands of a copy-style instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyArgs {
    /// Leading `--key[=value]` flags.
    pub flags: Vec<String>,
    /// Source operands, in order.
    pub sources: Vec<String>,
    /// Destination operand (last positional), when present.
    pub dest: Option<String>,
}

impl CopyArgs {
    /// Whether the instruction copies from another build stage.
    pub fn is_stage_copy(&self) -> bool {
        self.flags.iter().any(|f| f.starts_with("--from"))
    }
}

/// A parsed Dockerfile instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// COPY instruction
    Copy(CopyArgs),
    /// ADD instruction
    Add(CopyArgs),
    /// Any other instruction, identified by its uppercased keyword
    Other(String),
}

fn instruction_keyword(input: &str) -> IResult<&str, &str> {
    terminated(
        take_while1(|c: char| c.is_ascii_alphabetic()),
        space0,
    )(input)
}

/// Parse one logical (continuation-joined) line into an instruction.
pub fn parse_instruction(line: &str) -> Option<Instruction> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (rest, keyword) = instruction_keyword(trimmed).ok()?;
    match keyword.to_ascii_uppercase().as_str() {
        "COPY" => Some(Instruction::Copy(parse_copy_args(rest))),
        "ADD" => Some(Instruction::Add(parse_copy_args(rest))),
        other => Some(Instruction::Other(other.to_string())),
    }
}

fn parse_copy_args(args: &str) -> CopyArgs {
    let mut rest = args.trim();
    let mut flags = Vec::new();

    while rest.starts_with("--") {
        let end = rest
            .find(char::is_whitespace)
            .unwrap_or(rest.len());
        flags.push(rest[..end].to_string());
        rest = rest[end..].trim_start();
    }

    let mut operands = if rest.starts_with('[') {
        // JSON-array (exec) form: COPY ["src", "dst"]
        serde_json::from_str::<Vec<String>>(rest).unwrap_or_default()
    } else {
        split_operands(rest)
    };

    let dest = if operands.len() > 1 {
        operands.pop()
    } else {
        None
    };

    CopyArgs {
        flags,
        sources: operands,
        dest,
    }
}

/// Split shell-form operands on whitespace, honoring single and double quotes.
fn split_operands(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Join backslash-continued lines into logical lines, dropping blank lines
/// and full-line comments.
fn logical_lines(content: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for raw in content.lines() {
        let line = raw.trim_end();
        let trimmed = line.trim_start();
        if current.is_empty() && (trimmed.is_empty() || trimmed.starts_with('#')) {
            continue;
        }
        if let Some(stripped) = line.strip_suffix('\\') {
            current.push_str(stripped);
            current.push(' ');
        } else {
            current.push_str(line);
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Parse a whole Dockerfile into instructions.
pub fn parse_dockerfile(content: &str) -> Vec<Instruction> {
    logical_lines(content)
        .iter()
        .filter_map(|line| parse_instruction(line))
        .collect()
}

/// Extract every source-tree path referenced by copy-style instructions.
///
/// Stage copies (`COPY --from=...`) and URL sources are skipped: neither
/// references the repository source tree.
pub fn copy_sources(content: &str) -> Vec<String> {
    let mut sources = Vec::new();
    for instruction in parse_dockerfile(content) {
        let args = match instruction {
            Instruction::Copy(args) | Instruction::Add(args) => args,
            Instruction::Other(_) => continue,
        };
        if args.is_stage_copy() {
            continue;
        }
        for source in args.sources {
            if source.starts_with("http://") || source.starts_with("https://") {
                continue;
            }
            sources.push(source);
        }
    }
    sources
}
