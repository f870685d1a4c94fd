// ============================================================
//  scan.rs - Parcurgerea ordonată a liniilor și contextul numelui de ACL
// ============================================================
//
//  Singura stare care trăiește între linii este numele ACL-ului curent.
//  Liniile trebuie consumate strict în ordine; faza de comparare a
//  regulilor (uniq) pornește abia după ce parcurgerea s-a terminat.
//
//  Concepte Rust demonstrate aici:
//  - Lifetime pe struct (`Scanner<'p>`): scanner-ul împrumută parser-ul
//  - `impl Default` pentru tipuri cu un constructor `new()`
//  - `?` pe `Option` în interiorul unui `filter_map`
// ============================================================

use crate::error::Result;
use crate::parser::AclParser;
use crate::rule::Rule;
use tracing::debug;

pub const UNKNOWN_ACL: &str = "(unknown)";

/// Numele celui mai recent ACL văzut în scanarea curentă
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclNameContext {
    current: String,
}

impl AclNameContext {
    pub fn new() -> Self {
        AclNameContext { current: UNKNOWN_ACL.to_string() }
    }

    pub fn observe(&mut self, name: Option<&str>) {
        if let Some(name) = name {
            if name != self.current {
                debug!(acl = name, "ACL nou");
                self.current = name.to_string();
            }
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }
}

impl Default for AclNameContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Rezultatul unei linii, împreună cu contextul în care a fost văzută
#[derive(Debug, Clone, PartialEq)]
pub struct LineOutcome {
    pub line_no: usize,
    pub acl_name: String,
    pub result: Result<Rule>,
}

/// O regulă parsată cu succes, pregătită pentru faza de comparare
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedLine {
    pub line_no: usize,
    pub acl_name: String,
    pub rule: Rule,
}

pub struct Scanner<'p> {
    parser: &'p dyn AclParser,
    context: AclNameContext,
    line_no: usize,
}

impl<'p> Scanner<'p> {
    pub fn new(parser: &'p dyn AclParser) -> Self {
        Scanner {
            parser,
            context: AclNameContext::new(),
            line_no: 0,
        }
    }

    /// Consumă următoarea linie. Erorile de parsare rămân în `result`;
    /// ele nu opresc scanarea.
    pub fn feed(&mut self, line: &str) -> LineOutcome {
        self.line_no += 1;

        let fields = self.parser.extract(line);
        self.context.observe(fields.acl_name.as_deref());

        let result = Rule::from_fields(fields, line);
        if let Err(err) = &result {
            debug!(line_no = self.line_no, %err, "linie ignorată");
        }

        LineOutcome {
            line_no: self.line_no,
            acl_name: self.context.current().to_string(),
            result,
        }
    }

    pub fn acl_name(&self) -> &str {
        self.context.current()
    }
}

/// Faza secvențială: toate regulile valide, în ordine, cu numele ACL-ului lor.
///
/// O regulă cu o adresă sau un port invalid este sărită aici: o comparație
/// de containment ar avea nevoie de toate câmpurile.
pub fn scan_rules<'a, I>(parser: &dyn AclParser, lines: I) -> Vec<ScannedLine>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scanner = Scanner::new(parser);
    lines
        .into_iter()
        .filter_map(|line| {
            let outcome = scanner.feed(line);
            let rule = outcome.result.ok()?;
            if let Err(err) = rule.validate() {
                debug!(line_no = outcome.line_no, %err, "regulă exclusă de la comparare");
                return None;
            }
            Some(ScannedLine {
                line_no: outcome.line_no,
                acl_name: outcome.acl_name,
                rule,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AclError;
    use crate::parser::cisco::CiscoParser;
    use crate::parser::PatternSet;

    #[test]
    fn context_starts_unknown_and_follows_headers() {
        let parser = CiscoParser::new(PatternSet::standard());
        let mut scanner = Scanner::new(&parser);

        let first = scanner.feed(" 10 permit ip any any");
        assert_eq!(first.acl_name, UNKNOWN_ACL);
        assert!(first.result.is_ok());

        let header = scanner.feed("ip access-list extended OUTSIDE-IN");
        assert_eq!(header.acl_name, "OUTSIDE-IN");
        assert_eq!(header.result, Err(AclError::NotARule));

        let rule = scanner.feed(" 20 deny tcp any any eq telnet");
        assert_eq!(rule.acl_name, "OUTSIDE-IN");
        assert_eq!(rule.line_no, 3);

        // liniile ASA poartă numele ACL-ului pe fiecare linie
        let asa = scanner.feed("access-list acl762 line 1 extended permit ip any any");
        assert_eq!(asa.acl_name, "acl762");
        assert_eq!(scanner.acl_name(), "acl762");
    }

    #[test]
    fn bad_lines_do_not_stop_the_scan() {
        let parser = CiscoParser::new(PatternSet::standard());
        let rules = scan_rules(
            &parser,
            [
                "ip access-list extended EDGE",
                " permit ip 256.0.0.0 0.0.0.255 any",
                " permit tcp any any eq 443",
                "! comment",
                " deny ip any any",
            ],
        );
        let numbers: Vec<usize> = rules.iter().map(|r| r.line_no).collect();
        assert_eq!(numbers, vec![3, 5]);
        assert!(rules.iter().all(|r| r.rule.validate().is_ok()));
        assert!(rules.iter().all(|r| r.acl_name == "EDGE"));
    }
}
