use std::io::{self, BufRead, Write};

/// `EXIT` in any case ends an interactive session.
pub fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

/// Print `prompt`, read a line, hand it to `handle`; repeat until the
/// exit word or end of input. Returns how many lines were handled.
pub fn run_prompt_loop<R, W, F>(
    mut input: R,
    output: &mut W,
    prompt: &str,
    mut handle: F,
) -> io::Result<usize>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str, &mut W) -> io::Result<()>,
{
    let mut handled = 0;
    let mut line = String::new();
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }
        if is_exit(&line) {
            break;
        }
        handle(line.trim(), output)?;
        handled += 1;
    }
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn exit_is_case_insensitive() {
        assert!(is_exit("EXIT"));
        assert!(is_exit("exit\n"));
        assert!(is_exit("  Exit "));
        assert!(!is_exit("exits"));
        assert!(!is_exit(""));
    }

    #[test]
    fn stops_at_exit() {
        let mut out = Vec::new();
        let mut seen = Vec::new();
        let input = Cursor::new("king\n paris france \nExit\nqueen\n");
        let n = run_prompt_loop(input, &mut out, "> ", |l, _| {
            seen.push(l.to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(n, 2);
        assert_eq!(seen, ["king", "paris france"]);
        assert_eq!(String::from_utf8(out).unwrap(), "> > > ");
    }

    #[test]
    fn stops_at_end_of_input() {
        let mut out = Vec::new();
        let input = Cursor::new("a\nb");
        let n = run_prompt_loop(input, &mut out, "? ", |l, w| writeln!(w, "[{l}]")).unwrap();
        assert_eq!(n, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "? [a]\n? [b]\n? \n");
    }
}
