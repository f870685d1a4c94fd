// ============================================================
//  network.rs - Normalizarea rețelelor: host, mască, wildcard, CIDR
// ============================================================
//
//  Orice token de rețea acceptat de extractor devine o pereche
//  canonică (adresă, mască de subrețea) pe 32 de biți:
//
//    "any"                        -> (0xFFFFFFFF, 0x00000000)
//    "10.0.0.0 255.0.0.0"         -> (0x0A000000, 0xFF000000)
//    "10.0.0.0 0.255.255.255"     -> (0x0A000000, 0xFF000000)  wildcard
//    "10.0.0.0/8"                 -> (0x0A000000, 0xFF000000)
//
//  Adresa stocată NU este neapărat aliniată la mască; toate testele
//  combină valorile prin `& mask`, deci doar comparația mascată contează.
//
//  Concepte Rust demonstrate aici:
//  - Tipuri `Copy` mici (două u32) transmise prin valoare
//  - Constante asociate (`NetworkSpec::ANY`, `NetworkSpec::NEVER`)
//  - Operații pe biți (`&`, `^`, `<<`) și `u64` pentru shift-ul de 32
//  - Closure-uri care construiesc eroarea doar când e nevoie (`invalid()`)
// ============================================================

use crate::error::{AclError, Result};
use std::fmt;

const ALL_BITS: u32 = 0xFFFF_FFFF;

// ---------------------------------------------------------------------------
// O rețea canonică: adresă + mască de subrețea (nu wildcard)
//
// Două valori speciale: ANY (mască 0, acceptă orice adresă) și NEVER
// (adresă 0 cu mască completă, produsă de o mască malformată).
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkSpec {
    pub address: u32,
    pub mask: u32,
}

impl NetworkSpec {
    /// Rețeaua universală: se potrivește cu orice adresă
    pub const ANY: NetworkSpec = NetworkSpec { address: ALL_BITS, mask: 0 };

    /// Santinela pentru măști malformate: nu se potrivește (practic) cu nimic
    pub const NEVER: NetworkSpec = NetworkSpec { address: 0, mask: ALL_BITS };

    pub fn new(address: u32, mask: u32) -> Self {
        NetworkSpec { address, mask }
    }

    pub fn is_any(&self) -> bool {
        *self == Self::ANY
    }

    /// `ip_in_net` ca metodă
    pub fn contains_ip(&self, ip: u32) -> bool {
        ip_in_net(ip, *self)
    }

    /// `true` dacă rețeaua `self` include complet rețeaua `other`.
    ///
    /// Comparația numerică a măștilor este validă doar pentru măști
    /// contigue de la stânga, singurele pe care le produce `normalize`.
    pub fn contains(&self, other: &NetworkSpec) -> bool {
        (self.address & self.mask) == (other.address & self.mask) && self.mask <= other.mask
    }
}

impl fmt::Display for NetworkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            return write!(f, "any");
        }
        write!(
            f,
            "{}/{}",
            bits_to_address(self.address & self.mask),
            self.mask.leading_ones()
        )
    }
}

// ---------------------------------------------------------------------------
// Conversii adresă <-> biți
// ---------------------------------------------------------------------------

/// Transformă o adresă în notație zecimală cu puncte într-un u32.
///
/// Octeții cu zerouri în față sunt acceptați ("010" -> 10). Exact patru
/// octeți, fiecare 0..=255, altfel `InvalidAddress`.
pub fn address_to_bits(address: &str) -> Result<u32> {
    let invalid = || AclError::InvalidAddress(address.to_string());

    let mut bits: u32 = 0;
    let mut count = 0;
    for octet in address.split('.') {
        if octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        // Zerourile din față pot face stringul oricât de lung; le eliminăm înainte de parsare
        let digits = octet.trim_start_matches('0');
        let value: u32 = if digits.is_empty() {
            0
        } else if digits.len() > 3 {
            return Err(invalid());
        } else {
            digits.parse().map_err(|_| invalid())?
        };
        if value > 255 {
            return Err(invalid());
        }
        bits = (bits << 8) | value;
        count += 1;
    }

    if count != 4 {
        return Err(invalid());
    }
    Ok(bits)
}

/// Operația inversă lui `address_to_bits`
pub fn bits_to_address(bits: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        bits >> 24,
        (bits >> 16) & 0xFF,
        (bits >> 8) & 0xFF,
        bits & 0xFF
    )
}

pub fn ip_in_net(ip: u32, net: NetworkSpec) -> bool {
    (net.address & net.mask) == (ip & net.mask)
}

// ---------------------------------------------------------------------------
// Pereche adresă + mască, separate prin spațiu sau "/".
//
// Detectăm automat dacă a doua valoare este mască de subrețea sau wildcard,
// presupunând că biții sunt setați contiguu într-una din ele. Dacă nu,
// returnăm santinela NEVER - o linie malformată nu trebuie să oprească scanarea.
// ---------------------------------------------------------------------------
pub fn ip_and_mask_to_pair(pattern: &str) -> Result<NetworkSpec> {
    let mut parts = pattern
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter(|p| !p.is_empty());

    let net = address_to_bits(parts.next().unwrap_or_default())?;
    let mut net_or_wildcard = address_to_bits(parts.next().unwrap_or_default())?;

    // toți biții setați -> mască de host
    if net_or_wildcard == ALL_BITS {
        return Ok(NetworkSpec::new(net, ALL_BITS));
    }

    if !is_trailing_ones(net_or_wildcard) {
        net_or_wildcard = !net_or_wildcard;
        if !is_trailing_ones(net_or_wildcard) {
            return Ok(NetworkSpec::NEVER);
        }
    }

    Ok(NetworkSpec::new(net, ALL_BITS ^ net_or_wildcard))
}

pub fn ip_and_cidr_to_pair(pattern: &str) -> Result<NetworkSpec> {
    let (address, prefix) = pattern
        .split_once('/')
        .ok_or_else(|| AclError::InvalidAddress(pattern.to_string()))?;

    let net = address_to_bits(address.trim())?;
    let prefix: u32 = prefix
        .trim()
        .parse()
        .ok()
        .filter(|p| *p <= 32)
        .ok_or_else(|| AclError::InvalidAddress(pattern.to_string()))?;

    let wildcard = ((1u64 << (32 - prefix)) - 1) as u32;
    Ok(NetworkSpec::new(net, ALL_BITS ^ wildcard))
}

/// Punctul de intrare al normalizării: `any`, mască (spațiu sau "/"), sau CIDR.
pub fn normalize(token: &str) -> Result<NetworkSpec> {
    let token = token.trim();
    if token == "any" {
        return Ok(NetworkSpec::ANY);
    }

    match token.split_once('/') {
        // "A.B.C.D/E.F.G.H" este tot o pereche de măști, nu CIDR
        Some((_, rest)) if rest.contains('.') => ip_and_mask_to_pair(token),
        Some(_) => ip_and_cidr_to_pair(token),
        None if token.contains(char::is_whitespace) => ip_and_mask_to_pair(token),
        None => Err(AclError::InvalidAddress(token.to_string())),
    }
}

// v & (v+1) == 0  <=>  biții setați sunt contigui de la dreapta (wildcard)
fn is_trailing_ones(value: u32) -> bool {
    value & value.wrapping_add(1) == 0
}
