use std::fmt;
use std::str::FromStr;

use crate::DutopError;

/// Display unit for byte counts
///
/// Binary units scale by powers of 1024, decimal units by powers of 1000.
/// The scanner itself always works in raw bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    B,
    KiB,
    MiB,
    #[default]
    GiB,
    TiB,
    KB,
    MB,
    GB,
    TB,
}

impl Unit {
    /// All units, in the order they are offered to the user
    pub const ALL: [Unit; 9] = [
        Unit::B,
        Unit::KiB,
        Unit::MiB,
        Unit::GiB,
        Unit::TiB,
        Unit::KB,
        Unit::MB,
        Unit::GB,
        Unit::TB,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Unit::B => "B",
            Unit::KiB => "KiB",
            Unit::MiB => "MiB",
            Unit::GiB => "GiB",
            Unit::TiB => "TiB",
            Unit::KB => "KB",
            Unit::MB => "MB",
            Unit::GB => "GB",
            Unit::TB => "TB",
        }
    }

    /// Number of bytes in one of this unit
    pub fn divisor(&self) -> u64 {
        match self {
            Unit::B => 1,
            Unit::KiB => 1 << 10,
            Unit::MiB => 1 << 20,
            Unit::GiB => 1 << 30,
            Unit::TiB => 1 << 40,
            Unit::KB => 1_000,
            Unit::MB => 1_000_000,
            Unit::GB => 1_000_000_000,
            Unit::TB => 1_000_000_000_000,
        }
    }

    pub fn scale(&self, bytes: u64) -> f64 {
        bytes as f64 / self.divisor() as f64
    }

    /// Format bytes in this unit with one decimal, e.g. `1.5 GiB`
    pub fn format(&self, bytes: u64) -> String {
        format!("{:.1} {}", self.scale(bytes), self.label())
    }

    /// Comma separated list of every unit label
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(Unit::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = DutopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.label() == s)
            .ok_or_else(|| DutopError::InvalidUnit {
                unit: s.to_string(),
                choices: Self::choices(),
            })
    }
}

/// Format bytes into human-readable string
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TiB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GiB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MiB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KiB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a number with thousand separators (e.g., 1,234,567)
pub fn format_count(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }

    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}
