use super::error::ScriptError;
use super::grammar::Token;

pub fn tokenize(input: &str) -> Result<Vec<Token>, ScriptError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '0'..='9' => {
                let mut text = String::new();
                text.push(c);

                while let Some(ch) = chars.peek() {
                    if ch.is_ascii_digit() {
                        text.push(*ch);
                        chars.next();
                    } else {
                        break;
                    }
                }

                if chars.peek() == Some(&'.') {
                    text.push('.');
                    chars.next();
                    while let Some(ch) = chars.peek() {
                        if ch.is_ascii_digit() {
                            text.push(*ch);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }

                let value = text
                    .parse::<f64>()
                    .map_err(|_| ScriptError::UnexpectedChar(c))?;
                tokens.push(Token::Number(value));
            }

            'a'..='z' | 'A'..='Z' | '_' => {
                let mut s = String::new();
                s.push(c);

                while let Some(ch) = chars.peek() {
                    if ch.is_alphanumeric() || *ch == '_' {
                        s.push(*ch);
                        chars.next();
                    } else {
                        break;
                    }
                }

                let token = match s.as_str() {
                    "let" => Token::Let,
                    "print" => Token::Print,
                    "true" => Token::True,
                    "false" => Token::False,
                    _ => Token::Ident(s),
                };

                tokens.push(token);
            }

            '"' | '\'' => {
                let quote = c;
                let mut s = String::new();
                let mut closed = false;

                while let Some(ch) = chars.next() {
                    if ch == quote {
                        closed = true;
                        break;
                    }
                    if ch == '\\' {
                        match chars.next() {
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some(other) => s.push(other),
                            None => return Err(ScriptError::UnterminatedString),
                        }
                        continue;
                    }
                    s.push(ch);
                }

                if !closed {
                    return Err(ScriptError::UnterminatedString);
                }
                tokens.push(Token::Str(s));
            }

            '+' => tokens.push(Token::Plus),
            '-' => tokens.push(Token::Minus),
            '*' => tokens.push(Token::Star),
            '%' => tokens.push(Token::Percent),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            ',' => tokens.push(Token::Comma),
            ';' => tokens.push(Token::Semicolon),

            '/' => {
                if chars.peek() == Some(&'/') {
                    // Line comment: discard up to (not including) the newline.
                    while let Some(ch) = chars.peek() {
                        if *ch == '\n' {
                            break;
                        }
                        chars.next();
                    }
                } else {
                    tokens.push(Token::Slash);
                }
            }

            '=' => {
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::EqualEqual);
                } else {
                    tokens.push(Token::Equal);
                }
            }

            '!' => {
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::BangEqual);
                } else {
                    tokens.push(Token::Bang);
                }
            }

            '<' => {
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::LessEqual);
                } else {
                    tokens.push(Token::Less);
                }
            }

            '>' => {
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::GreaterEqual);
                } else {
                    tokens.push(Token::Greater);
                }
            }

            '&' => {
                if chars.peek() == Some(&'&') {
                    chars.next();
                    tokens.push(Token::AndAnd);
                } else {
                    return Err(ScriptError::UnexpectedChar('&'));
                }
            }

            '|' => {
                if chars.peek() == Some(&'|') {
                    chars.next();
                    tokens.push(Token::OrOr);
                } else {
                    return Err(ScriptError::UnexpectedChar('|'));
                }
            }

            c if c.is_whitespace() => {}
            other => return Err(ScriptError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}
