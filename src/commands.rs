//! Command implementations for pii-core-cli.
//!
//! Every command returns its process exit code: 0 on success, 1 when the
//! work itself failed, 2 for usage and configuration errors.

use std::path::{Path, PathBuf};

use pii_core::config::{self, CoreConfig};
use pii_core::detection::{DetectionPolicy, DetectorSelection, ExtractedText, FileCategory, PIIDetection};
use pii_core::masking::{DecryptPipeline, DecryptStatus, Masker, MaskingRequest, MaskingStrategy};
use pii_core::scheduler::{masked_output_path, BatchProcessor, FileJob};
use pii_core::{telemetry, PIIDetector, PIIType};

use crate::cli_parser::ParsedArgs;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

const PASSWORD_ENV: &str = "PII_CORE_PASSWORD";

struct Runtime {
    config: CoreConfig,
    detector: PIIDetector,
}

/// Load configuration, install logging and build the detector.
fn bootstrap(parsed: &ParsedArgs) -> Result<Runtime, i32> {
    let config = match config::load(parsed.get("--config").map(Path::new)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(EXIT_USAGE);
        }
    };
    telemetry::init_logging(config.logging.format, &config.logging.level);
    match PIIDetector::from_config(&config) {
        Ok(detector) => Ok(Runtime { config, detector }),
        Err(e) => {
            eprintln!("Failed to build detector: {}", e);
            Err(EXIT_USAGE)
        }
    }
}

fn parse(args: &[String], allowed: &[&str], usage: &str) -> Result<ParsedArgs, i32> {
    let parsed = ParsedArgs::parse(args, 2)
        .and_then(|p| p.check_known(allowed).map(|_| p))
        .map_err(|e| {
            eprintln!("{}", e);
            EXIT_USAGE
        })?;
    if parsed.positional.len() != 1 {
        eprintln!("Usage: {}", usage);
        return Err(EXIT_USAGE);
    }
    Ok(parsed)
}

fn password(parsed: &ParsedArgs) -> Option<String> {
    parsed.get("--password").map(str::to_string).or_else(|| std::env::var(PASSWORD_ENV).ok())
}

fn parse_types(list: &str) -> Result<Vec<PIIType>, String> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| PIIType::from_name(s).ok_or_else(|| format!("Unknown PII type: {}", s.trim())))
        .collect()
}

fn build_request(strategy: &str, password: Option<String>) -> Result<MaskingRequest, String> {
    let strategy = MaskingStrategy::parse(strategy).ok_or_else(|| format!("Unknown strategy: {}", strategy))?;
    let request = match strategy {
        MaskingStrategy::Hash => MaskingRequest::hash(password.unwrap_or_default()),
        other => MaskingRequest::new(other),
    };
    request.validate().map_err(|e| e.to_string())?;
    Ok(request)
}

/// `detect <FILE>`
pub fn run_detect(args: &[String]) -> i32 {
    let parsed = match parse(
        args,
        &["--category", "--extracted", "--label-anchored", "--classify", "--json", "--config"],
        "pii-core-cli detect <FILE> [--category C] [--extracted] [--json]",
    ) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let path = PathBuf::from(&parsed.positional[0]);

    let category = match parsed.get("--category") {
        Some(name) => match FileCategory::from_name(name) {
            Some(c) => Some(c),
            None => {
                eprintln!("Unknown category: {}", name);
                return EXIT_USAGE;
            }
        },
        None if parsed.has("--extracted") => None,
        None => FileCategory::from_path(&path),
    };

    let runtime = match bootstrap(&parsed) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let input = match read_input(&path, category, parsed.has("--extracted")) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_FAILED;
        }
    };

    let mut policy = category.map(DetectionPolicy::for_category).unwrap_or(DetectionPolicy::CLASSIFIED);
    if parsed.has("--label-anchored") {
        policy.selection = DetectorSelection::LabelAnchored;
    }
    if parsed.has("--classify") {
        policy.classify = true;
    }

    let detections = runtime.detector.detect(&input, policy);
    if parsed.has("--json") {
        return print_json(&detections);
    }
    print_detections(&path, &detections);
    EXIT_OK
}

fn read_input(path: &Path, category: Option<FileCategory>, extracted: bool) -> Result<ExtractedText, String> {
    if extracted {
        let content = std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        return serde_json::from_str(&content).map_err(|e| format!("Invalid extraction JSON: {}", e));
    }
    match category {
        Some(c) if c.is_text_like() => std::fs::read_to_string(path)
            .map(ExtractedText::from_text)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e)),
        Some(c) => Err(format!("{:?} files need extracted text; pass extraction JSON with --extracted", c)),
        None => Err(format!("Unknown file type: {} (use --category)", path.display())),
    }
}

fn print_detections(path: &Path, detections: &[PIIDetection]) {
    if detections.is_empty() {
        println!("No PII detected in {}", path.display());
        return;
    }
    println!("{} PII value(s) in {}:", detections.len(), path.display());
    println!("{:<16} {:<16} {:>6} {:>5} {:>5}  VALUE", "TYPE", "CATEGORY", "CONF", "PAGE", "COUNT");
    for d in detections {
        println!(
            "{:<16} {:<16} {:>6.2} {:>5} {:>5}  {}",
            d.pii_type.as_str(),
            d.category.as_str(),
            d.confidence,
            d.page,
            d.occurrence_count,
            d.value
        );
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            EXIT_FAILED
        }
    }
}

/// `mask <FILE> --strategy S`
pub fn run_mask(args: &[String]) -> i32 {
    let parsed = match parse(
        args,
        &["--strategy", "--password", "--types", "--out", "--config"],
        "pii-core-cli mask <FILE> --strategy S [--password P] [--types T,..] [--out FILE]",
    ) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let input = PathBuf::from(&parsed.positional[0]);

    let Some(strategy) = parsed.get("--strategy") else {
        eprintln!("Missing --strategy (blackout, hash, blur, pixelate)");
        return EXIT_USAGE;
    };
    let is_hash = MaskingStrategy::parse(strategy) == Some(MaskingStrategy::Hash);
    let mut request = match build_request(strategy, if is_hash { password(&parsed) } else { None }) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_USAGE;
        }
    };
    if let Some(list) = parsed.get("--types") {
        match parse_types(list) {
            Ok(types) => request = request.with_types(types),
            Err(e) => {
                eprintln!("{}", e);
                return EXIT_USAGE;
            }
        }
    }

    let category = match FileCategory::from_path(&input) {
        Some(c) if c.is_text_like() => c,
        _ => {
            eprintln!("mask handles text, tabular and key-value files: {}", input.display());
            return EXIT_USAGE;
        }
    };

    let runtime = match bootstrap(&parsed) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let text = match std::fs::read_to_string(&input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input.display(), e);
            return EXIT_FAILED;
        }
    };
    let detections = runtime.detector.detect_text(&text, DetectionPolicy::for_category(category));

    let output = parsed.get("--out").map(PathBuf::from).unwrap_or_else(|| masked_output_path(&input, None));
    let masker = Masker::new(runtime.config.masking.clone());
    match masker.mask_text_file(&input, &output, &detections, &request) {
        Ok((report, sidecar)) => {
            println!("Masked {} occurrence(s) with {} -> {}", report.masked, request.strategy, output.display());
            for skip in &report.skipped {
                println!("  skipped {} on page {}: {}", skip.pii_type, skip.page, skip.reason);
            }
            if let Some(path) = sidecar {
                println!("Hash metadata: {}", path.display());
            }
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Masking failed: {}", e);
            EXIT_FAILED
        }
    }
}

/// `decrypt <FILE> --password P`
pub fn run_decrypt(args: &[String]) -> i32 {
    let parsed = match parse(
        args,
        &["--password", "--meta", "--json", "--config"],
        "pii-core-cli decrypt <FILE> --password P [--meta PATH] [--json]",
    ) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let path = PathBuf::from(&parsed.positional[0]);
    let Some(password) = password(&parsed).filter(|p| !p.is_empty()) else {
        eprintln!("Missing --password (or set {})", PASSWORD_ENV);
        return EXIT_USAGE;
    };

    let runtime = match bootstrap(&parsed) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let policy = FileCategory::from_path(&path).map(DetectionPolicy::for_category).unwrap_or_default();
    let pipeline = DecryptPipeline::new(runtime.detector);

    let outcome = match pipeline.run_file(&path, &password, parsed.get("--meta").map(Path::new), policy) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Decrypt failed: {}", e);
            return EXIT_FAILED;
        }
    };

    let code = if outcome.status == DecryptStatus::NoValuesDecrypted { EXIT_FAILED } else { EXIT_OK };
    if parsed.has("--json") {
        let printed = print_json(&outcome);
        return if printed == EXIT_OK { code } else { printed };
    }
    match outcome.status {
        DecryptStatus::NoCandidates => eprintln!("No known tokens found in {}", path.display()),
        DecryptStatus::NoValuesDecrypted => {
            eprintln!("{} token(s) found, none decrypted (wrong password?)", outcome.candidates)
        }
        DecryptStatus::Decrypted => eprintln!(
            "Decrypted {} of {} token(s); {} PII value(s) re-detected",
            outcome.decrypted,
            outcome.candidates,
            outcome.detections.len()
        ),
    }
    print!("{}", outcome.text);
    code
}

/// `batch <DIR>`
pub fn run_batch(args: &[String]) -> i32 {
    let parsed = match parse(
        args,
        &["--mask", "--password", "--out", "--json", "--config"],
        "pii-core-cli batch <DIR> [--mask S] [--password P] [--out DIR] [--json]",
    ) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let dir = PathBuf::from(&parsed.positional[0]);

    let request = match parsed.get("--mask") {
        Some(strategy) => {
            let is_hash = MaskingStrategy::parse(strategy) == Some(MaskingStrategy::Hash);
            match build_request(strategy, if is_hash { password(&parsed) } else { None }) {
                Ok(r) => Some(r),
                Err(e) => {
                    eprintln!("{}", e);
                    return EXIT_USAGE;
                }
            }
        }
        None => None,
    };

    let files = match collect_files(&dir) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to list {}: {}", dir.display(), e);
            return EXIT_FAILED;
        }
    };

    let runtime = match bootstrap(&parsed) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let mut processor = match BatchProcessor::new(&runtime.config, runtime.detector) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to start workers: {}", e);
            return EXIT_FAILED;
        }
    };
    if let Some(out) = parsed.get("--out") {
        if let Err(e) = std::fs::create_dir_all(out) {
            eprintln!("Failed to create {}: {}", out, e);
            return EXIT_FAILED;
        }
        processor = processor.with_output_dir(out);
    }

    let jobs: Vec<FileJob> = files
        .into_iter()
        .map(|path| match &request {
            Some(r) => FileJob::mask(path, r.clone()),
            None => FileJob::detect(path),
        })
        .collect();

    let report = processor.run(jobs);
    let code = if report.failed() == 0 { EXIT_OK } else { EXIT_FAILED };
    if parsed.has("--json") {
        let printed = print_json(&report);
        return if printed == EXIT_OK { code } else { printed };
    }

    for r in &report.results {
        match &r.error {
            None => println!("ok      {}  detections={} masked={}", r.path.display(), r.detections.len(), r.masked),
            Some(err) => println!(
                "failed  {}  [{}] {}",
                r.path.display(),
                r.error_code.as_deref().unwrap_or("PII_UNKNOWN"),
                err
            ),
        }
    }
    println!(
        "Batch {}: {} succeeded, {} failed, {} detection(s)",
        report.batch_id,
        report.succeeded(),
        report.failed(),
        report.total_detections()
    );
    code
}

/// Supported files directly inside `dir`, sorted, excluding earlier
/// outputs and sidecars.
fn collect_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || FileCategory::from_path(&path).is_none() {
            continue;
        }
        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        if stem.ends_with(pii_core::scheduler::batch::MASKED_SUFFIX) || stem.ends_with("_hash_meta") {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_types() {
        assert_eq!(parse_types("phone, email").unwrap(), vec![PIIType::Phone, PIIType::Email]);
        assert!(parse_types("phone,nonsense").is_err());
    }

    #[test]
    fn test_build_request_requires_password_for_hash() {
        assert!(build_request("hash", None).is_err());
        assert_eq!(build_request("hash", Some("pw".into())).unwrap().strategy, MaskingStrategy::Hash);
        assert!(build_request("smudge", None).is_err());
    }

    #[test]
    fn test_collect_files_skips_outputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.txt", "a_masked.txt", "a_masked_hash_meta.json", "b.csv", "notes.xyz"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        let names: Vec<String> = collect_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.csv"]);
    }
}
