//! Classifier: the three judgments that decide whether a response is worth
//! surfacing, matches the target's learned negative-response fingerprint, or
//! is evidence of a directory worth recursing into.

use crate::calibrator::{CalibrationSet, ResponseSignature};

/// True iff some calibration signature shares the response's status and its
/// size is within 5% of the signature's size. Signatures with `size == 0`
/// are ignored — an empty baseline must never suppress a real finding.
pub fn matches_signature(
    status: u16,
    size: u64,
    calibration: &CalibrationSet,
) -> bool {
    calibration.signatures().iter().any(|sig: &ResponseSignature| {
        sig.size != 0 && sig.status == status && size_within_tolerance(size, sig.size)
    })
}

fn size_within_tolerance(size: u64, baseline: u64) -> bool {
    let diff = size.abs_diff(baseline) as f64;
    diff / baseline as f64 < 0.05
}

/// True iff the status is in `[200, 400)` or is `401`/`403`. Everything
/// else (404s, 5xx) is discarded unless it triggers method fuzzing or
/// bypass elsewhere in the pipeline.
pub fn is_interesting(status: u16) -> bool {
    (200..400).contains(&status) || status == 401 || status == 403
}

/// True iff the status is `301`, `302`, `403`, or the URL ends in `/`. Feeds
/// the Recursion Controller.
pub fn is_directory(status: u16, url: &str) -> bool {
    matches!(status, 301 | 302 | 403) || url.ends_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibrator::CalibrationSet;

    #[test]
    fn is_interesting_covers_2xx_3xx_401_403() {
        for status in [200, 204, 301, 399, 401, 403] {
            assert!(is_interesting(status), "{status} should be interesting");
        }
    }

    #[test]
    fn is_interesting_excludes_404_and_5xx() {
        for status in [400, 404, 500, 503] {
            assert!(!is_interesting(status), "{status} should not be interesting");
        }
    }

    #[test]
    fn is_directory_on_redirect_or_forbidden() {
        assert!(is_directory(301, "http://x/images"));
        assert!(is_directory(302, "http://x/images"));
        assert!(is_directory(403, "http://x/images"));
    }

    #[test]
    fn is_directory_on_trailing_slash() {
        assert!(is_directory(200, "http://x/images/"));
        assert!(!is_directory(200, "http://x/images"));
    }

    #[test]
    fn size_tolerance_is_five_percent() {
        assert!(size_within_tolerance(1000, 1000));
        assert!(size_within_tolerance(1040, 1000));
        assert!(!size_within_tolerance(1060, 1000));
    }

    #[test]
    fn empty_calibration_never_matches() {
        let empty = CalibrationSet::default();
        assert!(!matches_signature(404, 1500, &empty));
    }

    #[test]
    fn matches_within_tolerance_and_status() {
        let set = CalibrationSet::from_signatures(vec![ResponseSignature {
            status: 404,
            size: 1500,
            word_count: 10,
            line_count: 3,
        }]);
        assert!(matches_signature(404, 1530, &set));
        assert!(!matches_signature(404, 1600, &set));
        assert!(!matches_signature(200, 1500, &set));
    }

    #[test]
    fn zero_size_baseline_is_ignored() {
        let set = CalibrationSet::from_signatures(vec![ResponseSignature {
            status: 404,
            size: 0,
            word_count: 0,
            line_count: 1,
        }]);
        assert!(!matches_signature(404, 0, &set));
    }
}
