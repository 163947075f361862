//! Terminal prompt for ambiguous type mappings

use nuke_shield_common::{Mapping, MappingPrompt};
use std::io::{self, BufRead, Write};

/// Asks the operator on a terminal and reports every mapping decision
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output sink
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> MappingPrompt for TerminalPrompt<R, W> {
    fn ask(&mut self, source_type: &str, candidates: &[String]) -> io::Result<String> {
        writeln!(
            self.output,
            "No exact aws-nuke type found for {source_type}, but there are partial matches."
        )?;
        writeln!(
            self.output,
            "Type the number of the correct type, or -1 to omit these resources from the config:"
        )?;
        for (i, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "[{}] {candidate}", i + 1)?;
        }
        write!(self.output, "> ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for a mapping choice",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn report(&mut self, source_type: &str, mapping: &Mapping) {
        let message = match mapping {
            Mapping::Exact(target) | Mapping::Chosen(target) => {
                format!("Mapped {source_type} to type {target}")
            }
            Mapping::Declined { .. } => format!(
                "All mapping options refused. Resources of type {source_type} will be omitted from the config."
            ),
            Mapping::InvalidChoice { input, .. } => format!(
                "Invalid option '{input}'. Resources of type {source_type} will be omitted from the config."
            ),
            Mapping::Unmatched => format!(
                "No aws-nuke type resembles {source_type}. Its resources will be omitted from the config."
            ),
        };
        // Reporting is best effort, the decision is already made
        let _ = writeln!(self.output, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn candidates() -> Vec<String> {
        vec!["APIGatewayRestAPI".to_string(), "APIGatewayV2API".to_string()]
    }

    #[test]
    fn test_ask_lists_numbered_candidates() {
        let mut prompt = TerminalPrompt::new(Cursor::new("2\n"), Vec::new());
        let answer = prompt.ask("AWS::APIGateway::API", &candidates()).unwrap();
        assert_eq!(answer, "2");

        let out = String::from_utf8(prompt.into_output()).unwrap();
        assert!(out.contains("AWS::APIGateway::API"));
        assert!(out.contains("[1] APIGatewayRestAPI\n"));
        assert!(out.contains("[2] APIGatewayV2API\n"));
    }

    #[test]
    fn test_ask_trims_answer() {
        let mut prompt = TerminalPrompt::new(Cursor::new("  -1 \r\n"), Vec::new());
        assert_eq!(prompt.ask("AWS::X::Y", &candidates()).unwrap(), "-1");
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut prompt = TerminalPrompt::new(Cursor::new(""), Vec::new());
        let err = prompt.ask("AWS::X::Y", &candidates()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_report_messages() {
        let mut prompt = TerminalPrompt::new(Cursor::new(""), Vec::new());
        prompt.report("AWS::S3::Bucket", &Mapping::Exact("S3Bucket".to_string()));
        prompt.report(
            "AWS::X::Y",
            &Mapping::InvalidChoice {
                input: "9".to_string(),
                candidates: candidates(),
            },
        );
        prompt.report("AWS::Custom::Thing", &Mapping::Unmatched);

        let out = String::from_utf8(prompt.into_output()).unwrap();
        assert!(out.contains("Mapped AWS::S3::Bucket to type S3Bucket"));
        assert!(out.contains("Invalid option '9'"));
        assert!(out.contains("No aws-nuke type resembles AWS::Custom::Thing"));
    }
}
