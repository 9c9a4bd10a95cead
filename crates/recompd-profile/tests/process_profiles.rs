//! End-to-end profile-processing runs through the public API, with a toy
//! analyzer that honors the percent-growth thresholds the way the real
//! profile toolchain is expected to.

use std::path::PathBuf;

use recompd_profile::{
    AnalyzerError, FlockProfileLock, MergeAnalysis, ProcessingResult, ProfileAssistant,
    ProfileOptions, SignificanceAnalyzer,
};

/// Treats a profile as a newline-separated list of `m:`/`c:` records.
/// Merging unions the records; significance compares percent growth in
/// distinct methods and classes against the configured thresholds.
struct RecordCounting;

fn records(blob: &[u8], prefix: &str) -> Result<Vec<String>, AnalyzerError> {
    let text = std::str::from_utf8(blob).map_err(|_| AnalyzerError::BadProfiles {
        reason: "profile is not utf-8".to_string(),
    })?;
    Ok(text
        .lines()
        .filter(|line| line.starts_with(prefix))
        .map(str::to_string)
        .collect())
}

fn percent_growth(before: usize, after: usize) -> u32 {
    if before == 0 {
        return if after > 0 { u32::MAX } else { 0 };
    }
    u32::try_from((after - before) * 100 / before).unwrap_or(u32::MAX)
}

impl SignificanceAnalyzer for RecordCounting {
    fn analyze(
        &self,
        inputs: &[Vec<u8>],
        reference: &[u8],
        options: &ProfileOptions,
    ) -> Result<MergeAnalysis, AnalyzerError> {
        let mut methods = records(reference, "m:")?;
        let mut classes = records(reference, "c:")?;
        let (base_methods, base_classes) = (methods.len(), classes.len());

        for input in inputs {
            for record in records(input, "m:")? {
                if !methods.contains(&record) {
                    methods.push(record);
                }
            }
            for record in records(input, "c:")? {
                if !classes.contains(&record) {
                    classes.push(record);
                }
            }
        }

        let significant = percent_growth(base_methods, methods.len())
            > options.min_new_methods_percent_change
            || percent_growth(base_classes, classes.len())
                > options.min_new_classes_percent_change;

        let mut merged = String::new();
        for record in methods.iter().chain(classes.iter()) {
            merged.push_str(record);
            merged.push('\n');
        }
        Ok(MergeAnalysis {
            merged: merged.into_bytes(),
            significant,
        })
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    input: PathBuf,
    reference: PathBuf,
}

fn fixture(reference: &str, input: &str) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let input_path = dir.path().join("current.prof");
    std::fs::write(&input_path, input).expect("seed input");
    let reference_path = dir.path().join("reference.prof");
    std::fs::write(&reference_path, reference).expect("seed reference");
    Fixture {
        _dir: dir,
        input: input_path,
        reference: reference_path,
    }
}

fn run(fx: &Fixture, options: &ProfileOptions) -> ProcessingResult {
    ProfileAssistant::process_profiles(
        &FlockProfileLock,
        &RecordCounting,
        std::slice::from_ref(&fx.input),
        &fx.reference,
        options,
    )
}

#[test]
fn growth_past_threshold_compiles_and_merges() {
    // 5 methods + 5 new ones = 100% growth, past the default 20%.
    let reference = "m:a\nm:b\nm:c\nm:d\nm:e\n";
    let input = "m:f\nm:g\nm:h\nm:i\nm:j\n";
    let fx = fixture(reference, input);

    assert_eq!(run(&fx, &ProfileOptions::default()), ProcessingResult::Compile);
    let merged = std::fs::read_to_string(&fx.reference).expect("read merged");
    assert_eq!(merged.lines().count(), 10);
    assert!(merged.contains("m:a\n") && merged.contains("m:j\n"));
}

#[test]
fn growth_below_threshold_skips_and_preserves_reference() {
    // 10 methods + 1 new one = 10% growth, below the default 20%.
    let reference = "m:a\nm:b\nm:c\nm:d\nm:e\nm:f\nm:g\nm:h\nm:i\nm:j\n";
    let input = "m:k\n";
    let fx = fixture(reference, input);

    assert_eq!(
        run(&fx, &ProfileOptions::default()),
        ProcessingResult::SkipCompilation
    );
    assert_eq!(
        std::fs::read_to_string(&fx.reference).expect("read reference"),
        reference
    );
}

#[test]
fn class_growth_alone_is_sufficient() {
    // No method growth, but classes double.
    let reference = "m:a\nc:x\nc:y\n";
    let input = "c:z\nc:w\n";
    let fx = fixture(reference, input);

    assert_eq!(run(&fx, &ProfileOptions::default()), ProcessingResult::Compile);
}

#[test]
fn raised_thresholds_turn_compile_into_skip() {
    let reference = "m:a\nm:b\nm:c\nm:d\nm:e\n";
    let input = "m:f\n"; // 20% growth
    let fx = fixture(reference, input);

    // Default threshold (strictly greater than 20%) already skips at exactly 20%.
    assert_eq!(
        run(&fx, &ProfileOptions::default()),
        ProcessingResult::SkipCompilation
    );

    // Lowering the threshold flips the verdict.
    let lenient = ProfileOptions {
        min_new_methods_percent_change: 10,
        ..ProfileOptions::default()
    };
    assert_eq!(run(&fx, &lenient), ProcessingResult::Compile);
}

#[test]
fn malformed_input_is_a_bad_profiles_error() {
    let fx = fixture("m:a\n", "");
    std::fs::write(&fx.input, [0xff, 0xfe, 0x00]).expect("write non-utf8 input");

    assert_eq!(
        run(&fx, &ProfileOptions::default()),
        ProcessingResult::ErrorBadProfiles
    );
    assert_eq!(
        std::fs::read_to_string(&fx.reference).expect("read reference"),
        "m:a\n"
    );
}

#[test]
fn force_merge_always_compiles_once_inputs_parse() {
    let reference = "m:a\nm:b\nm:c\nm:d\nm:e\nm:f\nm:g\nm:h\nm:i\nm:j\n";
    let input = "m:k\n"; // insignificant on its own
    let fx = fixture(reference, input);

    let options = ProfileOptions {
        force_merge: true,
        ..ProfileOptions::default()
    };
    assert_eq!(run(&fx, &options), ProcessingResult::Compile);
    let merged = std::fs::read_to_string(&fx.reference).expect("read merged");
    assert!(merged.contains("m:k\n"));
}
