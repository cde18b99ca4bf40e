//! Runtime support module for the Crux language.
//!
//! Compiled Crux programs call these functions by their source-level names,
//! so the emitted assembly can be linked against this crate's static library.
//! Booleans cross the boundary as 64-bit integers (0 or 1).

#![allow(non_snake_case)]

use std::io::{self, BufRead, Read, Write};

/// Print an integer to stdout (no newline)
#[no_mangle]
pub extern "C" fn printInt(n: i64) {
    write_stdout(&n.to_string());
}

/// Print a boolean to stdout (no newline)
#[no_mangle]
pub extern "C" fn printBool(b: i64) {
    write_stdout(format_bool(b));
}

/// 文字コードを1文字として出力する
#[no_mangle]
pub extern "C" fn printChar(c: i64) {
    let text = char::from_u32(c as u32).map(String::from).unwrap_or_default();
    write_stdout(&text);
}

/// 改行を出力する
#[no_mangle]
pub extern "C" fn println() {
    write_stdout("\n");
}

/// 標準入力から整数を1つ読む。読めなければ0
#[no_mangle]
pub extern "C" fn readInt() -> i64 {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => parse_int(&line),
        Err(e) => {
            log::warn!("failed to read from stdin: {}", e);
            0
        }
    }
}

/// 標準入力から1バイト読む。入力の終わりでは -1
#[no_mangle]
pub extern "C" fn readChar() -> i64 {
    let mut byte = [0u8; 1];
    match io::stdin().lock().read(&mut byte) {
        Ok(1) => byte[0] as i64,
        _ => -1,
    }
}

// 生成コードは libc の exit で終了するので、書くたびにフラッシュする
fn write_stdout(text: &str) {
    if let Err(e) = write_flushed(&mut io::stdout().lock(), text) {
        log::warn!("failed to write to stdout: {}", e);
    }
}

fn write_flushed(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

fn format_bool(b: i64) -> &'static str {
    if b != 0 {
        "true"
    } else {
        "false"
    }
}

fn parse_int(line: &str) -> i64 {
    line.split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bool() {
        assert_eq!(format_bool(1), "true");
        assert_eq!(format_bool(0), "false");
        assert_eq!(format_bool(-3), "true");
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42\n"), 42);
        assert_eq!(parse_int("  -7 13"), -7);
        assert_eq!(parse_int("abc"), 0);
        assert_eq!(parse_int(""), 0);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_flushed_reports_failures() {
        let mut buffer = Vec::new();
        write_flushed(&mut buffer, "true").unwrap();
        assert_eq!(buffer, b"true");

        let err = write_flushed(&mut ClosedPipe, "5").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
