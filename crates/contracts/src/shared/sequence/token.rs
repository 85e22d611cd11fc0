/// Часть шаблона номера
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(&'a str),
    /// `{NAME}`, имя без скобок
    Variable(&'a str),
    /// `{COUNTER:N}`. `width` равен `None`, если `N` не десятичное число.
    Counter { width: Option<usize>, raw: &'a str },
}

impl<'a> Token<'a> {
    /// Текст токена так, как он записан в шаблоне
    pub fn source(&self) -> String {
        match self {
            Token::Literal(text) => (*text).to_string(),
            Token::Variable(name) => format!("{{{}}}", name),
            Token::Counter { raw, .. } => format!("{{{}}}", raw),
        }
    }
}

const COUNTER_PREFIX: &str = "COUNTER:";

/// Разбить шаблон на текст и токены `{...}`.
///
/// `{` без закрывающей `}` - обычный текст.
pub fn tokenize(pattern: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open + 1..].find('}').map(|i| open + 1 + i) else {
            break;
        };
        // `{a{B}`: токен начинается с последней `{` перед `}`
        let open = open + rest[open..close].rfind('{').unwrap_or(0);

        if open > 0 {
            tokens.push(Token::Literal(&rest[..open]));
        }
        tokens.push(classify(&rest[open + 1..close]));
        rest = &rest[close + 1..];
    }

    if !rest.is_empty() {
        tokens.push(Token::Literal(rest));
    }
    tokens
}

fn classify(inner: &str) -> Token<'_> {
    match inner.strip_prefix(COUNTER_PREFIX) {
        Some(width) => Token::Counter {
            width: parse_width(width),
            raw: inner,
        },
        None => Token::Variable(inner),
    }
}

fn parse_width(width: &str) -> Option<usize> {
    if width.is_empty() || !width.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    width.parse().ok()
}
