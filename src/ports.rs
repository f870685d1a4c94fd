// ============================================================
//  ports.rs - Evaluarea clauzelor de port (eq, neq, gt, lt, range)
// ============================================================
//
//  Gramatica (cuvinte cheie case-sensitive):
//    any | eq v1 [v2 ...] | neq v | gt v | lt v | range a b
//
//  Limitele sunt incluse: intervalul complet este [0, 65535].
//
//  Concepte Rust demonstrate aici:
//  - Slice patterns (`[v]`, `[a, b]`, `[_, ..]`) pentru aritatea clauzei
//  - `collect::<Result<Vec<_>>>()`: prima valoare invalidă oprește parsarea
//  - Constante asociate (`PortRange::FULL`)
//  - `impl Display` pentru forma canonică a clauzei
// ============================================================

use crate::error::{AclError, Result};
use std::fmt;

pub const PORT_MIN: u32 = 0;
pub const PORT_MAX: u32 = u16::MAX as u32;

// ---------------------------------------------------------------------------
// Anvelopa [min, max] a unei clauze
//
// Folosim `u32` ca `gt 65535` să poată produce intervalul vid [65536, 65535]
// fără overflow. `min > max` înseamnă interval vid (ex: `lt 0`).
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub min: u32,
    pub max: u32,
}

impl PortRange {
    pub const FULL: PortRange = PortRange { min: PORT_MIN, max: PORT_MAX };

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn contains(&self, port: u16) -> bool {
        let port = u32::from(port);
        self.min <= port && port <= self.max
    }

    pub fn within(&self, other: &PortRange) -> bool {
        self.is_empty() || (other.min <= self.min && self.max <= other.max)
    }
}

// ---------------------------------------------------------------------------
// O clauză de port evaluată
//
// `eq` și `neq` păstrează valorile discrete; `gt`, `lt` și `range` devin
// direct un interval.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSpec {
    Any,
    Range(PortRange),
    /// `eq` cu una sau mai multe valori
    Equal(Vec<u16>),
    NotEqual(u16),
}

impl PortSpec {
    pub fn parse(token: &str) -> Result<PortSpec> {
        let unparsable = || AclError::UnparsableNumeric(token.to_string());
        let mut words = token.split_whitespace();

        let keyword = match words.next() {
            None => return Ok(PortSpec::Any),
            Some(k) => k,
        };
        let values = words
            .map(|w| w.parse::<u16>().map_err(|_| unparsable()))
            .collect::<Result<Vec<u16>>>()?;

        let spec = match (keyword, values.as_slice()) {
            ("any", []) => PortSpec::Any,
            ("eq", [_, ..]) => PortSpec::Equal(values.clone()),
            ("neq", [v]) => PortSpec::NotEqual(*v),
            ("gt", [v]) => PortSpec::Range(PortRange { min: u32::from(*v) + 1, max: PORT_MAX }),
            ("lt", [v]) => match u32::from(*v).checked_sub(1) {
                Some(max) => PortSpec::Range(PortRange { min: PORT_MIN, max }),
                None => PortSpec::Range(PortRange { min: 1, max: 0 }),
            },
            ("range", [a, b]) => {
                PortSpec::Range(PortRange { min: u32::from(*a), max: u32::from(*b) })
            }
            _ => return Err(unparsable()),
        };
        Ok(spec)
    }

    pub fn contains(&self, port: u16) -> bool {
        match self {
            PortSpec::Any => true,
            PortSpec::Range(range) => range.contains(port),
            PortSpec::Equal(values) => values.contains(&port),
            PortSpec::NotEqual(value) => *value != port,
        }
    }

    pub fn envelope(&self) -> PortRange {
        match self {
            PortSpec::Any | PortSpec::NotEqual(_) => PortRange::FULL,
            PortSpec::Range(range) => *range,
            PortSpec::Equal(values) => PortRange {
                min: values.iter().copied().min().map_or(PORT_MIN, u32::from),
                max: values.iter().copied().max().map_or(PORT_MAX, u32::from),
            },
        }
    }

    /// `true` dacă orice port acceptat de `self` este acceptat și de `other`.
    ///
    /// Comparația se face pe anvelope [min, max]. Singura rafinare: față de un
    /// `eq` cu mai multe valori se cere incluziune de mulțimi. Un `neq` are
    /// anvelopa completă pe ambele părți, deci `eq 22` este inclus în `neq 22`
    /// (aproximare cunoscută).
    pub fn is_subset_of(&self, other: &PortSpec) -> bool {
        match other {
            PortSpec::Equal(allowed) if allowed.len() > 1 => match self {
                PortSpec::Equal(values) => values.iter().all(|v| allowed.contains(v)),
                PortSpec::Range(range) if range.is_empty() => true,
                PortSpec::Range(range) => {
                    // nu iterăm peste intervale mai late decât lista
                    range.max - range.min < allowed.len() as u32
                        && (range.min..=range.max)
                            .all(|p| allowed.iter().any(|a| u32::from(*a) == p))
                }
                PortSpec::Any | PortSpec::NotEqual(_) => false,
            },
            _ => self.envelope().within(&other.envelope()),
        }
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Any => write!(f, "any"),
            PortSpec::Range(r) => write!(f, "range {} {}", r.min, r.max),
            PortSpec::Equal(values) => {
                write!(f, "eq")?;
                for v in values {
                    write!(f, " {v}")?;
                }
                Ok(())
            }
            PortSpec::NotEqual(v) => write!(f, "neq {v}"),
        }
    }
}
