//! Command-line construction for the consent helper.
//!
//! `CreateProcessAsUserW` takes a single command-line string that the child
//! splits back into arguments with the `CommandLineToArgvW` rules. Arguments
//! are quoted accordingly so an empty current version still reaches the
//! helper as its own (empty) first argument.

/// Build `"program" arg1 arg2 ...` with Windows argument quoting.
pub fn build_command_line(program: &str, args: &[String]) -> String {
    let mut line = String::with_capacity(program.len() + 2);
    // The program name is parsed up to the closing quote without escapes.
    line.push('"');
    line.push_str(program);
    line.push('"');

    for arg in args {
        line.push(' ');
        append_quoted(&mut line, arg);
    }
    line
}

fn append_quoted(line: &mut String, arg: &str) {
    if !arg.is_empty() && !arg.contains([' ', '\t', '\n', '\x0b', '"']) {
        line.push_str(arg);
        return;
    }

    line.push('"');
    let mut backslashes = 0usize;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                push_backslashes(line, backslashes * 2 + 1);
                line.push('"');
                backslashes = 0;
            }
            _ => {
                push_backslashes(line, backslashes);
                line.push(c);
                backslashes = 0;
            }
        }
    }
    // Trailing backslashes precede the closing quote.
    push_backslashes(line, backslashes * 2);
    line.push('"');
}

fn push_backslashes(line: &mut String, count: usize) {
    line.extend(std::iter::repeat_n('\\', count));
}
