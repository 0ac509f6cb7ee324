//! sed and awk: safe as filters, hazardous with in-place edits or
//! shell escapes.

use crate::eval::Decision;
use crate::parse::CommandInvocation;

/// awk program fragments that reach outside the text stream.
const AWK_ESCAPES: &[&str] = &["system(", "system (", "| getline", "|getline"];

pub fn inspect_sed(inv: &CommandInvocation) -> Decision {
    for arg in inv.tail() {
        if arg == "-i" || arg.starts_with("-i") || arg == "--in-place" {
            return Decision::ask("sed -i edits files in place");
        }
    }
    Decision::allow("sed as a stream filter")
}

pub fn inspect_awk(inv: &CommandInvocation) -> Decision {
    for arg in inv.tail() {
        if AWK_ESCAPES.iter().any(|esc| arg.contains(esc)) {
            return Decision::ask("awk program shells out");
        }
    }
    Decision::allow("awk as a stream filter")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn sed(cmd: &str) -> Decision {
        let parsed = parse(cmd).unwrap();
        inspect_sed(&parsed.invocations[0])
    }

    fn awk(cmd: &str) -> Decision {
        let parsed = parse(cmd).unwrap();
        inspect_awk(&parsed.invocations[0])
    }

    #[test]
    fn sed_filter_allowed() {
        assert!(sed("sed 's/foo/bar/' input.txt").is_allow());
        assert!(sed("sed -n '1,10p' file").is_allow());
    }

    #[test]
    fn sed_in_place_asks() {
        assert!(!sed("sed -i 's/foo/bar/' input.txt").is_allow());
        assert!(!sed("sed -i.bak 's/foo/bar/' input.txt").is_allow());
        assert!(!sed("sed --in-place 's/a/b/' f").is_allow());
    }

    #[test]
    fn awk_filter_allowed() {
        assert!(awk("awk '{print $1}' file").is_allow());
        assert!(awk("awk -F: '{print $2}'").is_allow());
    }

    #[test]
    fn awk_system_asks() {
        assert!(!awk("awk '{system(\"rm \" $1)}'").is_allow());
        assert!(!awk("awk 'BEGIN { system (\"id\") }'").is_allow());
    }

    #[test]
    fn awk_getline_pipe_asks() {
        assert!(!awk("awk '{\"date\" | getline d; print d}'").is_allow());
        assert!(!awk("awk '{cmd|getline}'").is_allow());
    }
}
