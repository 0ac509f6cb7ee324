//! chmod: world-writable and setuid/setgid/sticky modes need a human.

use crate::eval::Decision;
use crate::parse::CommandInvocation;

pub fn inspect(inv: &CommandInvocation) -> Decision {
    let Some(mode) = inv.tail().iter().find(|a| !a.starts_with('-')) else {
        return Decision::allow("chmod without a mode");
    };
    if let Some(reason) = numeric_hazard(mode) {
        return Decision::ask(reason);
    }
    if let Some(reason) = symbolic_hazard(mode) {
        return Decision::ask(reason);
    }
    Decision::allow(format!("chmod {mode} is unremarkable"))
}

/// 3–4 digit octal modes, normalized to 4 digits: a nonzero special
/// digit sets setuid/setgid/sticky, an other-bits digit of 6 or 7 makes
/// the target world-writable.
fn numeric_hazard(mode: &str) -> Option<String> {
    if !(3..=4).contains(&mode.len()) || !mode.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let normalized = if mode.len() == 3 {
        format!("0{mode}")
    } else {
        mode.to_string()
    };
    let digits: Vec<u32> = normalized.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.iter().any(|&d| d > 7) {
        // Not octal; let it fail at runtime rather than guess.
        return None;
    }
    if digits[0] > 0 {
        return Some(format!("chmod {mode} sets setuid/setgid/sticky bits"));
    }
    if digits[3] >= 6 {
        return Some(format!("chmod {mode} makes the target world-writable"));
    }
    None
}

/// Symbolic clauses: `+s` anywhere, or a `+w` granted to others/all.
fn symbolic_hazard(mode: &str) -> Option<String> {
    for clause in mode.split(',') {
        if clause.contains("+s") {
            return Some(format!("chmod {mode} sets the setuid/setgid bit"));
        }
        if let Some(plus) = clause.find('+') {
            let (who, perms) = clause.split_at(plus);
            if perms.contains('w') && (who.is_empty() || who.contains('o') || who.contains('a'))
            {
                return Some(format!("chmod {mode} grants world write access"));
            }
        }
    }
    None
}
