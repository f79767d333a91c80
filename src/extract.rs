//! Rectangular text extraction via an external `pdftotext` binary
//!
//! The tool is invoked with an argv array (values are untrusted and never
//! pass through a shell) and writes into a scoped temporary file that is
//! removed on every exit path. The call blocks until the tool exits; no
//! timeout is imposed.

use crate::options::TextRegion;
use crate::types::{ComposeError, Result};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

/// Characters stripped from both ends of the extracted text: ASCII
/// whitespace plus NUL, vertical tab and form feed
const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\u{b}', '\u{c}'];

pub(crate) fn extract_text(input: &Path, region: &TextRegion) -> Result<String> {
    region.rect.validate()?;
    if region.page < 1 {
        return Err(ComposeError::InvalidArgument(
            "page index must be >= 1".to_string(),
        ));
    }

    let output = tempfile::Builder::new()
        .prefix("pdf-compose")
        .suffix(".txt")
        .tempfile()?;

    let args = build_args(input, output.path(), region);
    log::debug!("running pdftotext {:?}", args);
    let status = Command::new("pdftotext")
        .args(&args)
        .status()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                ComposeError::ExternalTool("pdftotext not found in PATH".to_string())
            }
            _ => ComposeError::Io(e),
        })?;
    if !status.success() {
        return Err(ComposeError::ExternalTool(format!(
            "pdftotext exited with {status}"
        )));
    }

    // A successful run that wrote nothing (or garbage) reads as empty
    let raw = std::fs::read_to_string(output.path()).unwrap_or_default();
    Ok(raw.trim_matches(TRIM_CHARS).to_string())
}

/// Argv for one pdftotext invocation: crop rectangle, resolution, and the
/// page range pinned to a single page
fn build_args(input: &Path, output: &Path, region: &TextRegion) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(16);
    for (flag, value) in [
        ("-x", region.rect.x),
        ("-y", region.rect.y),
        ("-W", region.rect.w),
        ("-H", region.rect.h),
    ] {
        args.push(flag.into());
        args.push((value.round() as i64).to_string().into());
    }
    args.push("-r".into());
    args.push(region.dpi.to_string().into());
    args.push("-f".into());
    args.push(region.page.to_string().into());
    args.push("-l".into());
    args.push(region.page.to_string().into());
    args.push(input.as_os_str().to_owned());
    args.push(output.as_os_str().to_owned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;
    use std::path::PathBuf;

    #[test]
    fn builds_the_documented_argv() {
        let region = TextRegion::new(Rect::new(67.0, 70.0, 18.0, 18.0))
            .with_page(3)
            .with_dpi(150);
        let args = build_args(
            &PathBuf::from("in.pdf"),
            &PathBuf::from("/tmp/out.txt"),
            &region,
        );
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-x", "67", "-y", "70", "-W", "18", "-H", "18", "-r", "150", "-f", "3", "-l",
                "3", "in.pdf", "/tmp/out.txt"
            ]
        );
    }

    #[test]
    fn rounds_fractional_coordinates() {
        let region = TextRegion::new(Rect::new(10.6, 0.4, 1.5, 2.0));
        let args = build_args(&PathBuf::from("a.pdf"), &PathBuf::from("b.txt"), &region);
        assert_eq!(args[1], "11");
        assert_eq!(args[3], "0");
        assert_eq!(args[5], "2");
    }

    #[test]
    fn rejects_negative_rectangles() {
        let region = TextRegion::new(Rect::new(-1.0, 0.0, 5.0, 5.0));
        let err = extract_text(&PathBuf::from("missing.pdf"), &region).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidArgument(_)));
    }

    #[test]
    fn trims_the_documented_character_set() {
        let padded = " \t\r\n\u{b}\u{c}\0hello world\0\u{c}\u{b}\n\r\t ";
        assert_eq!(padded.trim_matches(TRIM_CHARS), "hello world");
    }
}
