// ============================================================
//  parser/patterns.rs - Setul de pattern-uri pentru extragerea câmpurilor
// ============================================================
//
//  Pattern-urile sunt încercate în ordine, de la cel mai specific
//  la cel mai generic ("host <ip>" înaintea perechilor de adrese,
//  perechile înaintea CIDR, CIDR înaintea lui "any").
//
//  `PatternSet` este construit O SINGURĂ DATĂ la pornire (din
//  configurație) și transmis explicit extractorului.
//
//  Concepte Rust demonstrate aici:
//  - `once_cell::sync::Lazy` pentru setul standard, compilat o singură dată
//  - `Regex::replace_all` cu closure pentru înlocuirea numelor de servicii
//  - Conversia automată `regex::Error -> AclError` prin `#[from]` și `?`
// ============================================================

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

const NET_PATTERNS: &[&str] = &[
    r"host\D+(\d+\.\d+\.\d+\.\d+)",
    r"\D(\d+\.\d+\.\d+\.\d+\D\d+\.\d+\.\d+\.\d+)",
    r"\D(\d+\.\d+\.\d+\.\d+/\d+)",
    r"\s(any)",
];

const PORT_PATTERNS: &[&str] = &[
    r"\s(range\s+\d+\s+\d+)",
    r"\s(n?eq\s(\d+(\s|$))+)",
    r"\s(n?eq\s+\S+)",
    r"\s(gt\s+\d+)",
    r"\s(lt\s+\d+)",
    r"\s(any)",
];

const PROTOCOL_PATTERNS: &[&str] = &[r"\s(icmp|ip|tcp|udp)\s"];

// Acțiunea este citită doar din poziția ei în regulă: după un număr de
// secvență opțional sau după prefixul `access-list <nume> [line N] [extended]`.
// Un nume de ACL ca "deny-bogons" nu poate furniza o potrivire.
const ACTION_PATTERNS: &[&str] = &[
    r"^\s*(?:\d+\s+)?(permit|deny)\b",
    r"^\s*access-list\s+\S+\s+(?:line\s+\d+\s+)?(?:(?:extended|standard)\s+)?(permit|deny)\b",
];

const ACL_NAME_PATTERNS: &[&str] = &[
    r"^\s*ip\s+access-list\s+(?:(?:extended|standard)\s+)?(\S+)",
    r"^\s*access-list\s+(\S+)",
];

const EXTRA_PATTERNS: &[&str] = &[r"\s(established)\b"];

/// Numărul implicit de caractere de la finalul liniei în care un port
/// singular este considerat port destinație
pub const DEFAULT_PORT_TAIL_WINDOW: usize = 4;

/// Tabela numelor de servicii cunoscute (nume -> port)
pub const SERVICE_NAMES: &[(&str, u16)] = &[
    ("aol", 5190),
    ("bgp", 179),
    ("biff", 512),
    ("bootpc", 68),
    ("bootps", 67),
    ("chargen", 19),
    ("citrix-ica", 1494),
    ("cmd", 514),
    ("ctiqbe", 2748),
    ("daytime", 13),
    ("discard", 9),
    ("dnsix", 195),
    ("domain", 53),
    ("drip", 3949),
    ("echo", 7),
    ("exec", 512),
    ("finger", 79),
    ("ftp", 21),
    ("ftp-data", 20),
    ("gopher", 70),
    ("h323", 1720),
    ("hostname", 101),
    ("https", 443),
    ("ident", 113),
    ("imap4", 143),
    ("irc", 194),
    ("isakmp", 500),
    ("kerberos", 750),
    ("klogin", 543),
    ("kshell", 544),
    ("ldap", 389),
    ("ldaps", 636),
    ("login", 513),
    ("lotusnotes", 1352),
    ("lpd", 515),
    ("mobile-ip", 434),
    ("nameserver", 42),
    ("netbios-dgm", 138),
    ("netbios-ns", 137),
    ("netbios-ss", 139),
    ("netbios-ssn", 139),
    ("nntp", 119),
    ("non500-isakmp", 4500),
    ("ntp", 123),
    ("onep-plain", 15001),
    ("onep-tls", 15001),
    ("pcanywhere-data", 5631),
    ("pcanywhere-status", 5632),
    ("pim-auto-rp", 496),
    ("pop2", 109),
    ("pop3", 110),
    ("pptp", 1723),
    ("radius", 1645),
    ("radius-acct", 1646),
    ("rip", 520),
    ("secureid-udp", 5510),
    ("smtp", 25),
    ("snmp", 161),
    ("snmptrap", 162),
    ("sqlnet", 1521),
    ("ssh", 22),
    ("sunrpc", 111),
    ("sunrpc (rpc)", 111),
    ("syslog", 514),
    ("tacacs", 49),
    ("talk", 517),
    ("telnet", 23),
    ("tftp", 69),
    ("time", 37),
    ("uucp", 540),
    ("who", 513),
    ("whois", 43),
    ("www", 80),
    ("xdmcp", 177),
];

// Setul standard, fără servicii suplimentare. Pattern-urile sunt constante,
// deci un eșec de compilare este o eroare de programare.
static STANDARD: Lazy<Arc<PatternSet>> = Lazy::new(|| {
    Arc::new(
        PatternSet::new(&BTreeMap::new(), DEFAULT_PORT_TAIL_WINDOW)
            .expect("PatternSet standard: pattern invalid - eroare de programare!"),
    )
});

// ---------------------------------------------------------------------------
// Toate regex-urile extractorului, grupate pe tipul de câmp
//
// Câmpurile publice sunt liste ordonate: primul pattern care revendică
// un offset de start câștigă (vezi `match_patterns`).
// ---------------------------------------------------------------------------
#[derive(Debug)]
pub struct PatternSet {
    pub net: Vec<Regex>,
    pub port: Vec<Regex>,
    pub protocol: Vec<Regex>,
    pub action: Vec<Regex>,
    pub acl_name: Vec<Regex>,
    pub extra: Vec<Regex>,
    pub port_tail_window: usize,
    services: BTreeMap<String, u16>,
    service_names: Regex,
}

impl PatternSet {
    /// Construiește setul de pattern-uri; `extra_services` completează
    /// (și poate suprascrie) tabela standard de servicii.
    pub fn new(extra_services: &BTreeMap<String, u16>, port_tail_window: usize) -> Result<Self> {
        let mut services: BTreeMap<String, u16> = SERVICE_NAMES
            .iter()
            .map(|(name, port)| (name.to_string(), *port))
            .collect();
        services.extend(extra_services.iter().map(|(k, v)| (k.clone(), *v)));

        // Numele mai lungi primele: "ftp-data" nu trebuie să devină "21-data"
        let mut names: Vec<&String> = services.keys().collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = names
            .iter()
            .map(|name| {
                let tail = if name.ends_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
                format!(r"\b{}{}", regex::escape(name), tail)
            })
            .collect::<Vec<_>>()
            .join("|");

        Ok(PatternSet {
            net: compile(NET_PATTERNS)?,
            port: compile(PORT_PATTERNS)?,
            protocol: compile(PROTOCOL_PATTERNS)?,
            action: compile(ACTION_PATTERNS)?,
            acl_name: compile(ACL_NAME_PATTERNS)?,
            extra: compile(EXTRA_PATTERNS)?,
            port_tail_window,
            service_names: Regex::new(&alternation)?,
            services,
        })
    }

    /// Setul partajat cu tabela standard de servicii
    pub fn standard() -> Arc<PatternSet> {
        Arc::clone(&STANDARD)
    }

    /// Port numeric sau nume de serviciu ("ssh" -> 22)
    pub fn resolve_port(&self, value: &str) -> Option<u16> {
        let value = value.trim();
        value.parse().ok().or_else(|| self.services.get(value).copied())
    }

    /// Înlocuiește numele de servicii cu porturile lor, ca `eq ssh` să fie identic cu `eq 22`
    pub fn substitute_services<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.service_names.replace_all(line, |caps: &regex::Captures| {
            self.services
                .get(&caps[0])
                .map(|port| port.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(Into::into))
        .collect()
}
