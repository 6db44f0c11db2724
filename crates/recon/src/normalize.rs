//! Date text canonicalization.
//!
//! Only spelling is normalized (case, month names, `ABOUT`, periods). Day,
//! month and year order is left alone: two dates agree only when their
//! normalized text is identical, so a missed match is preferred over a
//! guessed reinterpretation.

const FOLDS: [(&str, &str); 12] = [
    ("JANUARY", "JAN"),
    ("FEBRUARY", "FEB"),
    ("MARCH", "MAR"),
    ("APRIL", "APR"),
    ("JUNE", "JUN"),
    ("JULY", "JUL"),
    ("AUGUST", "AUG"),
    ("SEPTEMBER", "SEP"),
    ("OCTOBER", "OCT"),
    ("NOVEMBER", "NOV"),
    ("DECEMBER", "DEC"),
    ("ABOUT", "ABT"),
];

/// `"Abt. March 1900"` becomes `"ABT MAR 1900"`.
///
/// Folding repeats until nothing changes, which keeps the function
/// idempotent even when one fold exposes another month name
/// (`"JULJULYY"`). Every fold shortens the text, so the loop ends.
pub fn normalize_date(text: &str) -> String {
    let mut current = text.to_uppercase();
    loop {
        let mut next = current.replace('.', "");
        for (long, short) in FOLDS {
            next = next.replace(long, short);
        }
        if next == current {
            return next;
        }
        current = next;
    }
}
