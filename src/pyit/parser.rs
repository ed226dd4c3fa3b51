//! PyitLang statement grammar - one small matcher per statement kind

/// Statement keywords, in dispatch priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Thatmat,
    Phyay,
    Pya,
    Mahsaw,
    Akyein,
    Lohp,
}

impl Keyword {
    pub const ALL: [Keyword; 6] = [
        Keyword::Thatmat,
        Keyword::Phyay,
        Keyword::Pya,
        Keyword::Mahsaw,
        Keyword::Akyein,
        Keyword::Lohp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Thatmat => "thatmat",
            Keyword::Phyay => "phyay",
            Keyword::Pya => "pya",
            Keyword::Mahsaw => "mahsaw",
            Keyword::Akyein => "akyein",
            Keyword::Lohp => "lohp",
        }
    }

    /// The first keyword the line starts with. This is a raw prefix test,
    /// so `pyathing` still belongs to `pya`.
    pub fn of_line(line: &str) -> Option<Keyword> {
        Self::ALL.into_iter().find(|kw| line.starts_with(kw.as_str()))
    }
}

/// `else` separator between the two branches of a conditional
const ELSE_SEPARATOR: &str = "} mahoat {";

/// A statement that matched its keyword's grammar. Expression and block
/// text is borrowed from the source line, untrimmed.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt<'a> {
    /// thatmat name = expr
    Declare { name: &'a str, expr: &'a str },
    /// phyay name = expr
    Assign { name: &'a str, expr: &'a str },
    /// pya expr
    Print(&'a str),
    /// mahsaw cond {then} mahoat {else}
    If {
        cond: &'a str,
        then_block: &'a str,
        else_block: &'a str,
    },
    /// akyein count {body}
    Loop { count: u64, body: &'a str },
    /// lohp name(args)
    Call { name: &'a str, args: Vec<&'a str> },
}

/// Split program or block text into trimmed, non-empty statement lines
pub fn statement_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim).filter(|line| !line.is_empty())
}

/// Match a line against the grammar of the given keyword
pub fn parse_statement(keyword: Keyword, line: &str) -> Option<Stmt<'_>> {
    match keyword {
        Keyword::Thatmat => {
            binding(line, keyword).map(|(name, expr)| Stmt::Declare { name, expr })
        }
        Keyword::Phyay => binding(line, keyword).map(|(name, expr)| Stmt::Assign { name, expr }),
        Keyword::Pya => parse_print(line),
        Keyword::Mahsaw => parse_conditional(line),
        Keyword::Akyein => parse_loop(line),
        Keyword::Lohp => parse_call(line),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split off a leading run of word characters; `None` if there is none
fn identifier(text: &str) -> Option<(&str, &str)> {
    let end = text.find(|c: char| !is_word_char(c)).unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    Some(text.split_at(end))
}

/// Strip `keyword` and exactly one following space
fn after_keyword(line: &str, keyword: Keyword) -> Option<&str> {
    line.strip_prefix(keyword.as_str())?.strip_prefix(' ')
}

/// `<keyword> <ident> = <expr>`
fn binding(line: &str, keyword: Keyword) -> Option<(&str, &str)> {
    let (name, rest) = identifier(after_keyword(line, keyword)?)?;
    let expr = rest.strip_prefix(" = ")?;
    if expr.is_empty() {
        return None;
    }
    Some((name, expr))
}

fn parse_print(line: &str) -> Option<Stmt<'_>> {
    let expr = after_keyword(line, Keyword::Pya)?;
    if expr.is_empty() {
        return None;
    }
    Some(Stmt::Print(expr))
}

/// Shortest-first match: the condition ends at the earliest ` {` that lets the
/// rest of the line complete, and the true branch ends at the earliest
/// `} mahoat {` that leaves a non-empty false branch before the final `}`.
fn parse_conditional(line: &str) -> Option<Stmt<'_>> {
    let rest = after_keyword(line, Keyword::Mahsaw)?;
    for (open, _) in rest.match_indices(" {") {
        if open == 0 {
            continue;
        }
        let cond = &rest[..open];
        let branches = &rest[open + 2..];
        for (sep, _) in branches.match_indices(ELSE_SEPARATOR) {
            if sep == 0 {
                continue;
            }
            let tail = &branches[sep + ELSE_SEPARATOR.len()..];
            match tail.strip_suffix('}') {
                Some(else_block) if !else_block.is_empty() => {
                    return Some(Stmt::If {
                        cond,
                        then_block: &branches[..sep],
                        else_block,
                    });
                }
                _ => {}
            }
        }
    }
    None
}

/// `akyein <digits> {<body>}`
fn parse_loop(line: &str) -> Option<Stmt<'_>> {
    let rest = after_keyword(line, Keyword::Akyein)?;
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits == 0 {
        return None;
    }
    // counts past u64 are rejected rather than clamped
    let count = rest[..digits].parse::<u64>().ok()?;
    let body = rest[digits..].strip_prefix(" {")?.strip_suffix('}')?;
    if body.is_empty() {
        return None;
    }
    Some(Stmt::Loop { count, body })
}

/// `lohp <ident>(<args>)`
fn parse_call(line: &str) -> Option<Stmt<'_>> {
    let (name, rest) = identifier(after_keyword(line, Keyword::Lohp)?)?;
    let args = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(Stmt::Call {
        name,
        args: args.split(',').map(str::trim).collect(),
    })
}
