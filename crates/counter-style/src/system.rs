//! Counter numbering systems.
//!
//! A [`System`] is a pure `integer → string` function together with the range
//! of values it can represent. Systems know nothing about negative-sign
//! decoration, padding, or fallback — that is [`Style`](crate::style::Style)
//! territory. Except for [`System::Cyclic`] and [`System::Fixed`], which
//! consume the raw counter value, a system is always handed a non-negative
//! magnitude.
//!
//! | Variant | Domain | Algorithm |
//! |---------|--------|-----------|
//! | `Cyclic` | all integers | `symbols[abs(v − 1) mod N]` |
//! | `Fixed` | one pass | `symbols[v − first]`, else unrepresentable |
//! | `Symbolic` | v ≥ 1 | symbol repeated `⌈v / N⌉` times, capped |
//! | `Alphabetic` | v ≥ 1 | bijective base-N, no zero digit |
//! | `Numeric` | all integers | positional base-N |
//! | `Additive` | v ≥ 0 | greedy sign-value decomposition |
//! | `Chinese` | magnitude ≤ 9999 | positional with zero elision |
//! | `Ethiopic` | v ≥ 1 | base-100 grouping with ፻/፼ separators |

/// Cap on how many times a symbolic system repeats its symbol.
///
/// Values needing more repetitions than this are unrepresentable and fall
/// through to the style's fallback chain.
pub const SYMBOLIC_REPEAT_LIMIT: i64 = 60;

/// Digit and marker set for the limited Chinese positional algorithm.
///
/// Covers the four `*-chinese-{informal,formal}` styles; Japanese and Korean
/// styles are plain additive tables and do not go through this path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChineseSet {
    /// Glyphs for the digits 0–9.
    pub digits: [char; 10],
    pub tens: char,
    pub hundreds: char,
    pub thousands: char,
    /// Informal sets render 10..=19 without the leading "one" digit.
    pub informal: bool,
}

/// A counter numbering system: the algorithmic half of a counter style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum System {
    /// Cycles repeatedly through its symbols for every integer.
    Cyclic { symbols: Vec<String> },
    /// Runs through its symbols exactly once, starting at `first`.
    Fixed { first: i32, symbols: Vec<String> },
    /// Repeats a single symbol, doubling, tripling, … as the value grows.
    Symbolic { symbols: Vec<String> },
    /// Bijective base-N numeral (spreadsheet column letters).
    Alphabetic { symbols: Vec<String> },
    /// Standard positional base-N numeral; `symbols[0]` renders zero.
    Numeric { symbols: Vec<String> },
    /// Greedy decomposition over `(weight, symbol)` pairs sorted by
    /// strictly descending weight. Zero is representable only through an
    /// explicit zero-weight entry.
    Additive { symbols: Vec<(i32, String)> },
    /// Limited Chinese positional algorithm, magnitudes up to 9999.
    Chinese(ChineseSet),
    /// Ethiopic numeric algorithm, values from 1 up.
    Ethiopic,
}

impl System {
    /// The inclusive range of counter values this system can represent,
    /// with `i32::MIN` / `i32::MAX` standing in for the open ends.
    pub fn range(&self) -> (i32, i32) {
        match self {
            System::Cyclic { .. } | System::Fixed { .. } | System::Numeric { .. } => {
                (i32::MIN, i32::MAX)
            }
            System::Symbolic { .. } | System::Alphabetic { .. } | System::Ethiopic => {
                (1, i32::MAX)
            }
            System::Additive { .. } => (0, i32::MAX),
            System::Chinese(_) => (-9999, 9999),
        }
    }

    /// Whether the style layer should strip the sign and apply negative
    /// decoration around this system's output. Cyclic and fixed systems
    /// consume the counter value as-is.
    pub fn uses_negative_sign(&self) -> bool {
        !matches!(self, System::Cyclic { .. } | System::Fixed { .. })
    }

    /// Render `value`, or `None` when it is unrepresentable.
    ///
    /// For systems with [`uses_negative_sign`](Self::uses_negative_sign),
    /// `value` is the already-stripped magnitude; `i64` so that the
    /// magnitude of `i32::MIN` is expressible.
    pub fn format(&self, value: i64) -> Option<String> {
        match self {
            System::Cyclic { symbols } => {
                let n = symbols.len() as i64;
                let idx = (value - 1).abs() % n;
                Some(symbols[idx as usize].clone())
            }
            System::Fixed { first, symbols } => {
                let idx = value - *first as i64;
                if idx >= 0 && (idx as usize) < symbols.len() {
                    Some(symbols[idx as usize].clone())
                } else {
                    None
                }
            }
            System::Symbolic { symbols } => format_symbolic(symbols, value),
            System::Alphabetic { symbols } => format_alphabetic(symbols, value),
            System::Numeric { symbols } => Some(format_numeric(symbols, value)),
            System::Additive { symbols } => format_additive(symbols, value),
            System::Chinese(set) => format_chinese(set, value),
            System::Ethiopic => format_ethiopic(value),
        }
    }
}

fn format_symbolic(symbols: &[String], value: i64) -> Option<String> {
    if value < 1 {
        return None;
    }
    let n = symbols.len() as i64;
    let repeats = (value - 1) / n + 1;
    if repeats > SYMBOLIC_REPEAT_LIMIT {
        return None;
    }
    let symbol = &symbols[((value - 1) % n) as usize];
    Some(symbol.repeat(repeats as usize))
}

fn format_alphabetic(symbols: &[String], value: i64) -> Option<String> {
    if value < 1 {
        return None;
    }
    let n = symbols.len() as i64;
    let mut v = value;
    let mut digits = Vec::new();
    while v > 0 {
        v -= 1;
        digits.push((v % n) as usize);
        v /= n;
    }
    let mut out = String::new();
    for &d in digits.iter().rev() {
        out.push_str(&symbols[d]);
    }
    Some(out)
}

fn format_numeric(symbols: &[String], value: i64) -> String {
    debug_assert!(value >= 0, "numeric systems format magnitudes");
    let n = symbols.len() as i64;
    if value == 0 {
        return symbols[0].clone();
    }
    let mut v = value;
    let mut digits = Vec::new();
    while v > 0 {
        digits.push((v % n) as usize);
        v /= n;
    }
    let mut out = String::new();
    for &d in digits.iter().rev() {
        out.push_str(&symbols[d]);
    }
    out
}

fn format_additive(symbols: &[(i32, String)], value: i64) -> Option<String> {
    if value < 0 {
        return None;
    }
    if value == 0 {
        // Zero is only representable through an explicit zero-weight symbol.
        return symbols
            .iter()
            .find(|(w, _)| *w == 0)
            .map(|(_, s)| s.clone());
    }
    let mut remaining = value;
    let mut out = String::new();
    for (weight, symbol) in symbols {
        let weight = *weight as i64;
        if weight <= 0 || weight > remaining {
            continue;
        }
        let count = remaining / weight;
        for _ in 0..count {
            out.push_str(symbol);
        }
        remaining -= count * weight;
        if remaining == 0 {
            break;
        }
    }
    if remaining != 0 {
        None
    } else {
        Some(out)
    }
}

fn format_chinese(set: &ChineseSet, value: i64) -> Option<String> {
    if !(0..=9999).contains(&value) {
        return None;
    }
    if value == 0 {
        return Some(set.digits[0].to_string());
    }
    let groups = [
        ((value / 1000 % 10) as usize, Some(set.thousands)),
        ((value / 100 % 10) as usize, Some(set.hundreds)),
        ((value / 10 % 10) as usize, Some(set.tens)),
        ((value % 10) as usize, None),
    ];
    let mut out = String::new();
    let mut started = false;
    let mut pending_zero = false;
    for (digit, marker) in groups {
        if digit == 0 {
            // Interior zero runs collapse into a single zero digit; trailing
            // zeros are dropped entirely.
            if started {
                pending_zero = true;
            }
            continue;
        }
        if pending_zero {
            out.push(set.digits[0]);
            pending_zero = false;
        }
        let elide_one =
            set.informal && digit == 1 && marker == Some(set.tens) && !started;
        if !elide_one {
            out.push(set.digits[digit]);
        }
        if let Some(m) = marker {
            out.push(m);
        }
        started = true;
    }
    Some(out)
}

const ETHIOPIC_ONES: [char; 9] = ['፩', '፪', '፫', '፬', '፭', '፮', '፯', '፰', '፱'];
const ETHIOPIC_TENS: [char; 9] = ['፲', '፳', '፴', '፵', '፶', '፷', '፸', '፹', '፺'];
const ETHIOPIC_HUNDRED: char = '፻';
const ETHIOPIC_TEN_THOUSAND: char = '፼';

fn format_ethiopic(value: i64) -> Option<String> {
    if value < 1 {
        return None;
    }
    if value == 1 {
        return Some(ETHIOPIC_ONES[0].to_string());
    }
    // Base-100 groups, least significant first.
    let mut groups = Vec::new();
    let mut v = value;
    while v > 0 {
        groups.push((v % 100) as usize);
        v /= 100;
    }
    let top = groups.len() - 1;
    let mut out = String::new();
    for i in (0..groups.len()).rev() {
        let group = groups[i];
        if group == 0 {
            // A zero group contributes no digits, but even-indexed groups
            // still carry their ten-thousands separator.
            if i > 0 && i % 2 == 0 {
                out.push(ETHIOPIC_TEN_THOUSAND);
            }
            continue;
        }
        let elide_one = group == 1 && (i == top || i % 2 == 1);
        if !elide_one {
            let tens = group / 10;
            let ones = group % 10;
            if tens > 0 {
                out.push(ETHIOPIC_TENS[tens - 1]);
            }
            if ones > 0 {
                out.push(ETHIOPIC_ONES[ones - 1]);
            }
        }
        if i > 0 {
            out.push(if i % 2 == 1 {
                ETHIOPIC_HUNDRED
            } else {
                ETHIOPIC_TEN_THOUSAND
            });
        }
    }
    Some(out)
}
