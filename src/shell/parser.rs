use std::path::PathBuf;

use crate::common::CommandSpec;

/// Literal sequence the parser replaces with the interpreter's own pid.
const PID_PLACEHOLDER: &str = "$$";

/// Parse one command line.
///
/// Blank lines and comment lines parse to `None`, as does a line holding
/// nothing but redirections and `&`. The pid placeholder is expanded
/// before tokenization, so it may also appear inside a word.
pub(crate) fn parse(line: &str, shell_pid: u32) -> Option<CommandSpec> {
    let line = line.strip_suffix('\n').unwrap_or(line);

    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let expanded = expand_pid_placeholder(line, shell_pid);

    let mut tokens: Vec<&str> = expanded.split_whitespace().collect();

    // Only a trailing `&` requests background execution; anywhere else it
    // is an ordinary argument.
    let background = tokens.last() == Some(&"&");
    if background {
        tokens.pop();
    }

    let mut words = Vec::new();
    let mut input = None;
    let mut output = None;

    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        match token {
            // a dangling redirection operator is ignored
            "<" => input = iter.next().map(PathBuf::from).or(input),
            ">" => output = iter.next().map(PathBuf::from).or(output),
            _ => words.push(token.to_string()),
        }
    }

    let mut words = words.into_iter();
    let program = words.next()?;

    Some(CommandSpec {
        program,
        arguments: words.collect(),
        input,
        output,
        background,
    })
}

fn expand_pid_placeholder(line: &str, pid: u32) -> String {
    let pid = pid.to_string();
    let mut expanded = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(index) = rest.find(PID_PLACEHOLDER) {
        expanded.push_str(&rest[..index]);
        expanded.push_str(&pid);
        rest = &rest[index + PID_PLACEHOLDER.len()..];
    }
    expanded.push_str(rest);

    expanded
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::parse;

    const PID: u32 = 4242;

    #[test]
    fn words_and_background() {
        let spec = parse("sleep 5 &\n", PID).unwrap();
        assert_eq!(spec.program, "sleep");
        assert_eq!(spec.arguments, ["5".to_string()]);
        assert!(spec.background);
        assert_eq!(spec.input, None);
        assert_eq!(spec.output, None);
    }

    #[test]
    fn redirections() {
        let spec = parse("wc -l < words.txt > counted.txt\n", PID).unwrap();
        assert_eq!(spec.program, "wc");
        assert_eq!(spec.arguments, ["-l".to_string()]);
        assert_eq!(spec.input, Some(PathBuf::from("words.txt")));
        assert_eq!(spec.output, Some(PathBuf::from("counted.txt")));
        assert!(!spec.background);
    }

    #[test]
    fn ampersand_only_trails() {
        let spec = parse("echo a & b\n", PID).unwrap();
        assert_eq!(
            spec.arguments,
            ["a".to_string(), "&".to_string(), "b".to_string()]
        );
        assert!(!spec.background);
    }

    #[test]
    fn pid_placeholder_expansion() {
        let spec = parse("echo pid-$$ $$\n", PID).unwrap();
        assert_eq!(spec.arguments, [format!("pid-{PID}"), PID.to_string()]);
    }

    #[test]
    fn blanks_and_comments() {
        assert_eq!(parse("\n", PID), None);
        assert_eq!(parse("", PID), None);
        assert_eq!(parse("# a comment\n", PID), None);
        assert_eq!(parse("&\n", PID), None);
    }

    #[test]
    fn dangling_redirection_is_ignored() {
        let spec = parse("cat <\n", PID).unwrap();
        assert_eq!(spec.program, "cat");
        assert_eq!(spec.input, None);
    }
}
