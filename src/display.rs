// ============================================================
//  display.rs - Output în consolă pentru comenzile grep și uniq
// ============================================================
//
//  Rezultatele (liniile găsite, perechile redundante) merg la stdout;
//  mesajele de status merg la stderr, ca output-ul să poată fi redirecționat.
//
//  Concepte Rust demonstrate aici:
//  - Trait-ul `Colorize` (crate-ul `colored`) adaugă metode pe `&str`
//  - `chrono::Local` pentru timestamp-ul mesajelor de status
// ============================================================

use aclgrep::ScannedLine;
use chrono::Local;
use colored::Colorize;

// Lățimea separatorului orizontal (în caractere)
const SEPARATOR_WIDTH: usize = 70;

/// Linie separatoare orizontală între perechile raportate de uniq
pub fn print_separator() {
    let line = "─".repeat(SEPARATOR_WIDTH);
    println!("{}", line.dimmed());
}

/// Mesaj informațional
pub fn log_info(msg: &str) {
    eprintln!(
        "{} {} {}",
        timestamp().bold().white(),
        " INFO ".on_green().black().bold(),
        msg.white()
    );
}

/// Avertisment - galben, pentru situații care merită atenție
pub fn log_warn(msg: &str) {
    eprintln!(
        "{} {} {}",
        timestamp().bold().white(),
        " WARN ".on_yellow().black().bold(),
        msg.yellow()
    );
}

/// Eroare - roșu aprins, pentru eșecuri non-fatale (ex: un fișier ilizibil)
pub fn log_error(msg: &str) {
    eprintln!(
        "{} {} {}",
        timestamp().bold().white(),
        " ERR  ".on_red().white().bold(),
        msg.red()
    );
}

/// O linie găsită de grep, adnotată cu sursa și numele ACL-ului
pub fn print_match(source: &str, acl_name: &str, line: &str) {
    println!(
        "{}:{}: {}",
        source.magenta(),
        acl_name.cyan(),
        line.trim()
    );
}

/// O regulă umbrită de o regulă anterioară mai largă
pub fn print_redundant(source: &str, earlier: &ScannedLine, later: &ScannedLine) {
    println!(
        "{} {}:{} [{}]",
        "[SHADOWED]".yellow().bold(),
        source.magenta(),
        later.line_no,
        later.acl_name.cyan()
    );
    println!("  {} {}", format!("{:>6}", later.line_no).dimmed(), later.rule.original_line.trim());
    println!(
        "  {} {} {}",
        format!("{:>6}", earlier.line_no).dimmed(),
        earlier.rule.original_line.trim().green(),
        "(o conține)".dimmed()
    );
    print_separator();
}

fn timestamp() -> String {
    Local::now().format("[%Y-%m-%d %H:%M:%S]").to_string()
}
