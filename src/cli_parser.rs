//! CLI argument parsing and help text for pii-core.

use std::collections::HashMap;

/// Options that take no value.
const FLAGS: &[&str] = &["--json", "--extracted", "--label-anchored", "--classify"];

/// Arguments after the command name.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedArgs {
    pub positional: Vec<String>,
    options: HashMap<String, String>,
    flags: Vec<String>,
}

impl ParsedArgs {
    /// Parse `args[start..]`. Errors name the offending argument.
    pub fn parse(args: &[String], start: usize) -> Result<Self, String> {
        let mut parsed = Self::default();
        let mut i = start;
        while i < args.len() {
            let arg = args[i].as_str();
            if FLAGS.contains(&arg) {
                parsed.flags.push(arg.to_string());
                i += 1;
            } else if arg.starts_with("--") {
                if i + 1 >= args.len() {
                    return Err(format!("Missing value for {}", arg));
                }
                parsed.options.insert(arg.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                parsed.positional.push(arg.to_string());
                i += 1;
            }
        }
        Ok(parsed)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn has(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Reject options outside `allowed` (flags included).
    pub fn check_known(&self, allowed: &[&str]) -> Result<(), String> {
        for key in self.options.keys().chain(self.flags.iter()) {
            if !allowed.contains(&key.as_str()) {
                return Err(format!("Unknown argument: {}", key));
            }
        }
        Ok(())
    }
}

/// Print general usage information.
pub fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "pii-core - PII detection and masking v{}

USAGE:
    pii-core-cli <COMMAND> [OPTIONS]

COMMANDS:
    detect       Detect PII in a file and list the findings
    mask         Mask detected PII in a text or tabular file
    decrypt      Decrypt a hash-masked file and re-run detection
    batch        Detect or mask every supported file in a directory
    version      Show version information
    help         Show this help message

OPTIONS:
    -h, --help       Show help for command
    -V, --version    Show version information
    --config FILE    Load configuration from a TOML file

EXAMPLES:
    pii-core-cli detect statement.txt
    pii-core-cli detect contacts.csv --json
    pii-core-cli mask contacts.csv --strategy blackout
    pii-core-cli mask contacts.csv --strategy hash --password s3cret
    pii-core-cli decrypt contacts_masked.csv --password s3cret
    pii-core-cli batch ./inbox --mask hash --out ./masked

ENVIRONMENT:
    PII_CORE_PASSWORD    Password for hash masking/decrypt when --password is absent
    PII_CORE_WORKERS     Batch worker threads (0 = one per CPU)
    PII_CORE_LOG_LEVEL   Log level (trace, debug, info, warn, error)
    PII_CORE_LOG_FORMAT  Log format (human, json)
    PII_CORE_KDF         KDF for new tokens (PBKDF2-SHA512, PBKDF2-SHA256)
    RUST_LOG             Tracing filter; overrides PII_CORE_LOG_LEVEL

EXIT CODES:
    0  Success
    1  Failure (nothing decrypted, failed files)
    2  Usage or configuration error
",
        version
    );
}

/// Print detailed help for a specific command.
pub fn print_command_help(command: &str) {
    match command {
        "detect" => print_detect_help(),
        "mask" => print_mask_help(),
        "decrypt" => print_decrypt_help(),
        "batch" => print_batch_help(),
        _ => {
            eprintln!(
                "No detailed help available for '{}'. Use 'pii-core-cli help' for general usage.",
                command
            );
        }
    }
}

fn print_detect_help() {
    eprintln!(
        "pii-core-cli detect - Detect PII in a file

USAGE:
    pii-core-cli detect <FILE> [OPTIONS]

OPTIONS:
    --category C       Source format: plain_text, tabular, key_value, paginated,
                       word_processing, image (default: from extension)
    --extracted        FILE is extraction/OCR output as JSON (pages + word boxes)
    --label-anchored   Use the label-anchored catalog
    --classify         Run document classification
    --json             Output detections as JSON
    --config FILE      Load configuration from file

DESCRIPTION:
    Text, tabular and key-value files are read directly. Other formats
    need their extracted text, passed with --extracted.
"
    );
}

fn print_mask_help() {
    eprintln!(
        "pii-core-cli mask - Mask PII in a text or tabular file

USAGE:
    pii-core-cli mask <FILE> --strategy S [OPTIONS]

OPTIONS:
    --strategy S     blackout, hash, blur or pixelate
    --password P     Required for hash (or set PII_CORE_PASSWORD)
    --types T,..     Only mask these types (e.g. phone,email)
    --out FILE       Output path (default: <stem>_masked.<ext> next to FILE)
    --config FILE    Load configuration from file

DESCRIPTION:
    Hash masking writes <out-stem>_hash_meta.json next to the output.
    Keep it: decrypt needs it together with the password.
"
    );
}

fn print_decrypt_help() {
    eprintln!(
        "pii-core-cli decrypt - Decrypt a hash-masked file

USAGE:
    pii-core-cli decrypt <FILE> --password P [OPTIONS]

OPTIONS:
    --password P     Password used for masking (or set PII_CORE_PASSWORD)
    --meta PATH      Sidecar file or directory of sidecars
                     (default: FILE's own sidecar, then its directory)
    --json           Output the outcome as JSON
    --config FILE    Load configuration from file

EXIT CODES:
    0  At least one value decrypted, or nothing to decrypt
    1  Tokens found but none decrypted (wrong password)
"
    );
}

fn print_batch_help() {
    eprintln!(
        "pii-core-cli batch - Process every supported file in a directory

USAGE:
    pii-core-cli batch <DIR> [OPTIONS]

OPTIONS:
    --mask S         Mask text files with strategy S instead of detecting only
    --password P     Required with --mask hash (or set PII_CORE_PASSWORD)
    --out DIR        Output directory for masked files
    --json           Output the batch report as JSON
    --config FILE    Load configuration from file

EXIT CODES:
    0  Every file succeeded
    1  At least one file failed
"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_mixed_arguments() {
        let a = args(&["cli", "mask", "in.csv", "--strategy", "hash", "--json"]);
        let parsed = ParsedArgs::parse(&a, 2).unwrap();
        assert_eq!(parsed.positional, vec!["in.csv"]);
        assert_eq!(parsed.get("--strategy"), Some("hash"));
        assert!(parsed.has("--json"));
        assert!(parsed.check_known(&["--strategy", "--json"]).is_ok());
        assert!(parsed.check_known(&["--strategy"]).is_err());
    }

    #[test]
    fn test_missing_option_value() {
        let a = args(&["cli", "mask", "in.csv", "--strategy"]);
        assert_eq!(ParsedArgs::parse(&a, 2), Err("Missing value for --strategy".to_string()));
    }
}
