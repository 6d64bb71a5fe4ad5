use crate::command::{CommandBody, Descriptor, ExitCode, Invocation, Item, Output};
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::stages::{Collector, Mapper, Reducer, Stages, Validator};
use argh::{EarlyExit, FromArgs};
use regex::RegexBuilder;
use std::fs;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`): the struct holds the
/// recognized flags, and the positionals left over become the parameters the
/// command's [`Stages`] work on. Only the per-item body is written by hand.
pub(crate) trait BuiltinCommand: Sized + FromArgs + 'static {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name() -> &'static str;

    /// Flags declared on the argh struct. Other words, even dash-prefixed
    /// ones, are passed through as parameters.
    const FLAGS: &'static [Flag] = &[];

    /// Stage choices; identity everywhere unless overridden.
    fn stages() -> Stages {
        Stages::default()
    }

    /// Moves the positional parameters out of the parsed flags.
    fn take_parameters(&mut self) -> Vec<String>;

    /// Executes the command over one reduced item.
    fn execute(&self, item: Item, env: &mut Environment) -> Result<Output>;
}

impl<T: BuiltinCommand> CommandBody for T {
    fn exec(&self, item: Item, env: &mut Environment) -> Result<Output> {
        T::execute(self, item, env)
    }
}

/// A flag recognized by a builtin, spelled as on the command line.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Flag {
    Switch(&'static str),
    /// Consumes the following word as its value.
    Value(&'static str),
}

impl Flag {
    fn spelling(self) -> &'static str {
        match self {
            Flag::Switch(s) | Flag::Value(s) => s,
        }
    }
}

/// Reorders `args` so argh sees recognized flags first and everything else
/// after `--`, in the original order.
fn split_known_flags<'a>(flags: &[Flag], args: &[&'a str]) -> Vec<&'a str> {
    let mut known = Vec::new();
    let mut rest = Vec::new();
    let mut args = args.iter().copied();
    while let Some(arg) = args.next() {
        if arg == "--help" {
            known.push(arg);
            continue;
        }
        match flags.iter().find(|f| f.spelling() == arg) {
            Some(Flag::Switch(_)) => known.push(arg),
            Some(Flag::Value(_)) => {
                known.push(arg);
                known.extend(args.next());
            }
            None => rest.push(arg),
        }
    }
    if !rest.is_empty() {
        known.push("--");
        known.extend(rest);
    }
    known
}

fn parse_args<T: BuiltinCommand>(name: &str, args: &[&str]) -> Result<Invocation> {
    let argv = split_known_flags(T::FLAGS, args);
    match T::from_args(&[name], &argv) {
        Ok(mut cmd) => {
            let parameters = cmd.take_parameters();
            Ok(Invocation::Run {
                parameters,
                body: Box::new(cmd),
            })
        }
        Err(EarlyExit {
            output,
            status: Ok(()),
        }) => Ok(Invocation::Help(output)),
        Err(EarlyExit {
            output,
            status: Err(()),
        }) => Err(ShellError::invalid_arguments(name, output.trim_end())),
    }
}

/// Descriptor for a builtin type.
pub(crate) fn descriptor<T: BuiltinCommand>() -> Descriptor {
    Descriptor {
        name: T::name(),
        stages: T::stages(),
        parse: parse_args::<T>,
    }
}

/// Every builtin, in registration order.
pub(crate) fn all() -> Vec<Descriptor> {
    vec![
        descriptor::<Echo>(),
        descriptor::<Wc>(),
        descriptor::<Cat>(),
        descriptor::<Grep>(),
        descriptor::<Pwd>(),
        descriptor::<Cd>(),
        descriptor::<Ls>(),
        descriptor::<Exit>(),
    ]
}

fn unexpected(command: &str, item: &Item) -> ShellError {
    ShellError::execution(command, format!("unexpected input {item:?}"))
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn stages() -> Stages {
        Stages {
            reducer: Reducer::CallOnce,
            ..Stages::default()
        }
    }

    fn take_parameters(&mut self) -> Vec<String> {
        Vec::new()
    }

    fn execute(&self, _item: Item, env: &mut Environment) -> Result<Output> {
        Ok(Output::Line(format!("{}\n", env.current_dir.to_string_lossy())))
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory. Defaults to $HOME when omitted.
    pub target: Vec<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn stages() -> Stages {
        Stages {
            validator: Validator::OneOrZeroArguments,
            reducer: Reducer::IgnorePipedAndUnite,
            collector: Collector::ConcatLists,
            ..Stages::default()
        }
    }

    fn take_parameters(&mut self) -> Vec<String> {
        std::mem::take(&mut self.target)
    }

    fn execute(&self, item: Item, env: &mut Environment) -> Result<Output> {
        let target = match item.into_words().into_iter().next() {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => match env.get_var("HOME") {
                Some(home) => PathBuf::from(home),
                None => return Err(ShellError::execution("cd", "no target and HOME not set")),
            },
        };

        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&new_dir).map_err(|e| {
            ShellError::execution("cd", format!("can't canonicalize {}: {e}", new_dir.display()))
        })?;

        std::env::set_current_dir(&canonical).map_err(|e| {
            ShellError::execution("cd", format!("can't chdir to {}: {e}", canonical.display()))
        })?;
        env.current_dir = canonical;
        Ok(Output::Lines(Vec::new()))
    }
}

#[derive(FromArgs)]
/// List the entries of a directory, sorted by name.
pub struct Ls {
    #[argh(positional)]
    /// directory to list; the current directory when omitted.
    pub path: Vec<String>,
}

impl BuiltinCommand for Ls {
    fn name() -> &'static str {
        "ls"
    }

    fn stages() -> Stages {
        Stages {
            validator: Validator::OneOrZeroArguments,
            reducer: Reducer::IgnorePipedAndUnite,
            collector: Collector::ConcatLists,
            ..Stages::default()
        }
    }

    fn take_parameters(&mut self) -> Vec<String> {
        std::mem::take(&mut self.path)
    }

    fn execute(&self, item: Item, env: &mut Environment) -> Result<Output> {
        let arg = item.into_words().into_iter().next();
        let dir = match &arg {
            Some(path) => env.current_dir.join(path),
            None => env.current_dir.clone(),
        };
        let shown = arg.unwrap_or_else(|| ".".to_string());

        let mut names = fs::read_dir(&dir)
            .and_then(|entries| {
                entries
                    .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
                    .collect::<std::io::Result<Vec<_>>>()
            })
            .map_err(|e| ShellError::file_access(&shown, e))?;
        names.sort();
        Ok(Output::Lines(names))
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {
    #[argh(positional)]
    /// exit status, 0 when omitted.
    pub code: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn stages() -> Stages {
        Stages {
            validator: Validator::OneOrZeroArguments,
            reducer: Reducer::IgnorePipedAndUnite,
            collector: Collector::ConcatLists,
            ..Stages::default()
        }
    }

    fn take_parameters(&mut self) -> Vec<String> {
        std::mem::take(&mut self.code)
    }

    fn execute(&self, item: Item, env: &mut Environment) -> Result<Output> {
        let code: ExitCode = match item.into_words().first() {
            Some(code) => code
                .parse()
                .map_err(|_| ShellError::invalid_arguments("exit", format!("{code}: numeric argument required")))?,
            None => 0,
        };
        env.request_exit(code);
        Ok(Output::Lines(Vec::new()))
    }
}

#[derive(FromArgs)]
/// write the arguments to standard output, separated by spaces.
/// by default, a trailing newline is printed.
pub struct Echo {
    #[argh(switch, short = 'n')]
    /// do not output the trailing newline.
    pub no_newline: bool,

    #[argh(positional, greedy)]
    /// values to print as-is, separated by spaces.
    pub args: Vec<String>,
}

impl BuiltinCommand for Echo {
    const FLAGS: &'static [Flag] = &[Flag::Switch("-n"), Flag::Switch("--no-newline")];

    fn name() -> &'static str {
        "echo"
    }

    fn stages() -> Stages {
        Stages {
            reducer: Reducer::IgnorePipedAndUnite,
            ..Stages::default()
        }
    }

    fn take_parameters(&mut self) -> Vec<String> {
        std::mem::take(&mut self.args)
    }

    fn execute(&self, item: Item, _env: &mut Environment) -> Result<Output> {
        let mut s = item.into_words().join(" ");
        if !self.no_newline {
            s.push('\n');
        }
        Ok(Output::Line(s))
    }
}

#[derive(FromArgs)]
/// count lines, words and bytes of each file, or of piped input
pub struct Wc {
    #[argh(positional)]
    /// files to count; piped input is counted when none are given.
    pub files: Vec<String>,
}

impl BuiltinCommand for Wc {
    fn name() -> &'static str {
        "wc"
    }

    fn stages() -> Stages {
        Stages {
            validator: Validator::RequiresAny,
            mapper: Mapper::NameToFileAndName,
            reducer: Reducer::IgnorePipedIfArgs,
            ..Stages::default()
        }
    }

    fn take_parameters(&mut self) -> Vec<String> {
        std::mem::take(&mut self.files)
    }

    fn execute(&self, item: Item, env: &mut Environment) -> Result<Output> {
        let (lines, bytes) = match &item {
            Item::Lines(lines) => (lines, lines.iter().map(String::len).sum::<usize>() as u64),
            Item::File { name, lines } => {
                let size = fs::metadata(env.current_dir.join(name))
                    .map_err(|e| ShellError::file_access(name, e))?
                    .len();
                (lines, size)
            }
            other => return Err(unexpected("wc", other)),
        };
        let words: usize = lines.iter().map(|l| l.split_whitespace().count()).sum();
        Ok(Output::Line(format!("{} {} {}\n", lines.len(), words, bytes)))
    }
}

#[derive(FromArgs)]
/// print file(s) or piped input to stdout
pub struct Cat {
    #[argh(positional)]
    /// files to print in order. If none provided, prints piped input.
    pub files: Vec<String>,
}

impl BuiltinCommand for Cat {
    fn name() -> &'static str {
        "cat"
    }

    fn stages() -> Stages {
        Stages {
            mapper: Mapper::NameToFile,
            reducer: Reducer::IgnorePipedIfArgs,
            collector: Collector::ConcatLists,
            ..Stages::default()
        }
    }

    fn take_parameters(&mut self) -> Vec<String> {
        std::mem::take(&mut self.files)
    }

    fn execute(&self, item: Item, _env: &mut Environment) -> Result<Output> {
        let mut lines = match item {
            Item::Lines(lines) => lines,
            other => return Err(unexpected("cat", &other)),
        };
        if let Some(last) = lines.last_mut() {
            last.push('\n');
        }
        Ok(Output::Lines(lines))
    }
}

#[derive(FromArgs)]
/// print lines matching a pattern
pub struct Grep {
    #[argh(positional)]
    /// the pattern to search for (a regular expression), then an optional file to search.
    /// Reads piped input when no file is given.
    pub args: Vec<String>,

    #[argh(switch, short = 'w')]
    /// match only whole words (using non-word characters as boundaries)
    pub word_regexp: bool,

    #[argh(switch, short = 'i')]
    /// ignore case distinctions
    pub ignore_case: bool,

    #[argh(option, short = 'A', default = "0")]
    /// print NUM lines of trailing context after matching lines
    pub after_context: usize,
}

impl Grep {
    fn matcher(&self, user_pattern: &str) -> Result<regex::Regex> {
        let pattern = if self.word_regexp {
            format!(r"\b({})\b", user_pattern)
        } else {
            user_pattern.to_string()
        };

        RegexBuilder::new(&pattern)
            .case_insensitive(self.ignore_case)
            .build()
            .map_err(|e| ShellError::invalid_arguments("grep", format!("invalid regex pattern {pattern}: {e}")))
    }

    /// Lines that match, each followed by up to `after_context` lines.
    ///
    /// Context windows that overlap are merged: a match inside a window restarts
    /// the countdown and no line is printed twice.
    fn scan(&self, re: &regex::Regex, lines: Vec<String>) -> Vec<String> {
        let mut counter: usize = 0;
        let mut result = Vec::new();
        for line in lines {
            counter = counter.saturating_sub(1);
            if re.is_match(&line) {
                counter = self.after_context + 1;
            }
            if counter > 0 {
                result.push(line);
            }
        }
        result
    }
}

impl BuiltinCommand for Grep {
    const FLAGS: &'static [Flag] = &[
        Flag::Switch("-w"),
        Flag::Switch("--word-regexp"),
        Flag::Switch("-i"),
        Flag::Switch("--ignore-case"),
        Flag::Value("-A"),
        Flag::Value("--after-context"),
    ];

    fn name() -> &'static str {
        "grep"
    }

    fn stages() -> Stages {
        Stages {
            validator: Validator::AtLeastTwoWithPiped,
            reducer: Reducer::SecondToFileOrPiped,
            collector: Collector::ConcatLists,
            ..Stages::default()
        }
    }

    fn take_parameters(&mut self) -> Vec<String> {
        std::mem::take(&mut self.args)
    }

    fn execute(&self, item: Item, _env: &mut Environment) -> Result<Output> {
        let (pattern, source) = match item {
            Item::Pair(pattern, source) => (*pattern, *source),
            other => return Err(unexpected("grep", &other)),
        };
        let (Item::Word(pattern), Item::Lines(lines)) = (pattern, source) else {
            return Err(ShellError::execution("grep", "expected a pattern and lines to search"));
        };
        let re = self.matcher(&pattern)?;
        Ok(Output::Lines(self.scan(&re, lines)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::run_descriptor;
    use pretty_assertions::assert_eq;
    use std::env as stdenv;
    use std::path::Path;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    /// Runs builtin `T` through the full stage pipeline.
    fn run<T: BuiltinCommand>(args: &[&str], piped: &[&str], env: &mut Environment) -> Result<Vec<String>> {
        run_descriptor(&descriptor::<T>(), &strings(args), &strings(piped), env)
    }

    fn env_in(dir: &Path) -> Environment {
        let mut env = Environment::new();
        env.current_dir = dir.to_path_buf();
        env
    }

    fn create_tmp_file(dir: &Path, name: &str, lines: &[&str]) -> String {
        let path = dir.join(name);
        fs::write(&path, lines.join("\n")).expect("write tmp file");
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let mut names: Vec<_> = all().iter().map(|d| d.name).collect();
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
    }

    #[test]
    fn test_pwd_prints_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = env_in(dir.path());
        let out = run::<Pwd>(&[], &["ignored"], &mut env).unwrap();
        assert_eq!(out, vec![format!("{}\n", dir.path().to_string_lossy())]);
    }

    #[test]
    fn test_echo_with_and_without_newline() {
        let mut env = Environment::new();
        assert_eq!(
            run::<Echo>(&["hello", "world"], &[], &mut env).unwrap(),
            vec!["hello world\n"]
        );
        assert_eq!(
            run::<Echo>(&["-n", "foo", "bar"], &[], &mut env).unwrap(),
            vec!["foo bar"]
        );
    }

    #[test]
    fn test_echo_ignores_piped() {
        let mut env = Environment::new();
        assert_eq!(run::<Echo>(&[], &["something"], &mut env).unwrap(), vec!["\n"]);
        assert_eq!(
            run::<Echo>(&["word"], &["something"], &mut env).unwrap(),
            vec!["word\n"]
        );
    }

    #[test]
    fn test_echo_keeps_inner_spaces() {
        let mut env = Environment::new();
        assert_eq!(
            run::<Echo>(&["word", "another", "with   spaces"], &[], &mut env).unwrap(),
            vec!["word another with   spaces\n"]
        );
    }

    #[test]
    fn test_echo_passes_unknown_dash_words_through() {
        let mut env = Environment::new();
        assert_eq!(run::<Echo>(&["-x"], &[], &mut env).unwrap(), vec!["-x\n"]);
        assert_eq!(run::<Echo>(&["-"], &[], &mut env).unwrap(), vec!["-\n"]);
        assert_eq!(run::<Echo>(&["-5"], &[], &mut env).unwrap(), vec!["-5\n"]);
        assert_eq!(
            run::<Echo>(&["a", "--", "-x", "b"], &[], &mut env).unwrap(),
            vec!["a -- -x b\n"]
        );
    }

    #[test]
    fn test_echo_known_flag_anywhere() {
        let mut env = Environment::new();
        assert_eq!(run::<Echo>(&["-x", "-n", "y"], &[], &mut env).unwrap(), vec!["-x y"]);
    }

    #[test]
    fn test_split_known_flags() {
        let flags = [Flag::Switch("-i"), Flag::Value("-A")];
        assert_eq!(
            split_known_flags(&flags, &["pat", "-A", "2", "-v", "-i", "file"]),
            vec!["-A", "2", "-i", "--", "pat", "-v", "file"]
        );
        assert_eq!(split_known_flags(&flags, &["-i"]), vec!["-i"]);
        assert_eq!(split_known_flags(&flags, &["--help", "x"]), vec!["--help", "--", "x"]);
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let _lock = lock_current_dir();
        let temp = tempfile::tempdir().unwrap();
        let canonical_temp = fs::canonicalize(temp.path()).expect("canonicalize failed");

        // restored before the temp dir goes away
        let orig = stdenv::current_dir().unwrap();
        let mut env = env_in(&orig);

        let target = canonical_temp.to_string_lossy().to_string();
        let res = run::<Cd>(&[&target], &[], &mut env);
        assert_eq!(res.unwrap(), Vec::<String>::new());

        let new_canonical = fs::canonicalize(stdenv::current_dir().unwrap()).unwrap();
        assert_eq!(new_canonical, canonical_temp);
        assert_eq!(env.current_dir, canonical_temp);

        stdenv::set_current_dir(orig).expect("failed to restore cwd");
    }

    #[test]
    fn test_cd_to_home_when_none() {
        let _lock = lock_current_dir();
        let temp = tempfile::tempdir().unwrap();
        let canonical_temp = fs::canonicalize(temp.path()).expect("canonicalize failed");

        let orig = stdenv::current_dir().unwrap();
        let mut env = env_in(&orig);
        env.set_var("HOME", canonical_temp.to_string_lossy().to_string());

        assert!(run::<Cd>(&[], &[], &mut env).is_ok());
        assert_eq!(env.current_dir, canonical_temp);

        stdenv::set_current_dir(orig).expect("failed to restore cwd");
    }

    #[test]
    fn test_cd_nonexistent_path_errors() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut env = env_in(&orig);

        let name = format!("nonexistent_dir_for_cd_test_{}", std::process::id());
        let res = run::<Cd>(&[&name], &[], &mut env);

        assert!(matches!(res, Err(ShellError::CommandExecution { .. })));
        assert_eq!(stdenv::current_dir().unwrap(), orig);
        assert_eq!(env.current_dir, orig);
    }

    #[test]
    fn test_cd_rejects_two_targets() {
        let mut env = Environment::new();
        let res = run::<Cd>(&["a", "b"], &[], &mut env);
        assert!(matches!(res, Err(ShellError::InvalidArguments { command, .. }) if command == "cd"));
    }

    #[test]
    fn test_ls_lists_sorted_names() {
        let dir = tempfile::tempdir().unwrap();
        create_tmp_file(dir.path(), "b.txt", &["x"]);
        create_tmp_file(dir.path(), "a.txt", &["x"]);
        fs::create_dir(dir.path().join("sub")).unwrap();
        let mut env = env_in(dir.path());

        assert_eq!(
            run::<Ls>(&[], &[], &mut env).unwrap(),
            vec!["a.txt", "b.txt", "sub"]
        );
        assert!(run::<Ls>(&["sub"], &[], &mut env).unwrap().is_empty());
        assert!(matches!(
            run::<Ls>(&["missing"], &[], &mut env),
            Err(ShellError::FileAccess { path, .. }) if path == "missing"
        ));
    }

    #[test]
    fn test_exit_requests_exit() {
        let mut env = Environment::new();
        assert!(run::<Exit>(&[], &[], &mut env).unwrap().is_empty());
        assert!(env.should_exit);
        assert_eq!(env.exit_code, 0);

        let mut env = Environment::new();
        run::<Exit>(&["3"], &[], &mut env).unwrap();
        assert_eq!(env.exit_code, 3);
    }

    #[test]
    fn test_exit_rejects_non_numeric_code() {
        let mut env = Environment::new();
        assert!(run::<Exit>(&["soon"], &[], &mut env).is_err());
        assert!(!env.should_exit);
    }

    #[test]
    fn test_cat_from_piped() {
        let mut env = Environment::new();
        assert_eq!(
            run::<Cat>(&[], &["something"], &mut env).unwrap(),
            vec!["something\n"]
        );
        assert_eq!(
            run::<Cat>(&[], &["something", "another something"], &mut env).unwrap(),
            vec!["something", "another something\n"]
        );
    }

    #[test]
    fn test_cat_from_two_files() {
        let dir = tempfile::tempdir().unwrap();
        let f1 = create_tmp_file(dir.path(), "test_file1", &["some text", "here"]);
        let f2 = create_tmp_file(dir.path(), "test_file2", &["another text", "there"]);
        let mut env = env_in(dir.path());

        assert_eq!(
            run::<Cat>(&[&f1, &f2], &[], &mut env).unwrap(),
            vec!["some text", "here\n", "another text", "there\n"]
        );
    }

    #[test]
    fn test_cat_ignores_piped_when_args_present() {
        let dir = tempfile::tempdir().unwrap();
        create_tmp_file(dir.path(), "test_file", &[" some test ", "here"]);
        let mut env = env_in(dir.path());

        // relative to the shell's working directory
        assert_eq!(
            run::<Cat>(&["test_file"], &["piped"], &mut env).unwrap(),
            vec![" some test ", "here\n"]
        );
    }

    #[test]
    fn test_cat_dash_word_is_a_file_name() {
        let dir = tempfile::tempdir().unwrap();
        create_tmp_file(dir.path(), "-n", &["dashed"]);
        let mut env = env_in(dir.path());

        assert_eq!(run::<Cat>(&["-n"], &[], &mut env).unwrap(), vec!["dashed\n"]);
    }

    #[test]
    fn test_cat_missing_file_stops_before_body() {
        let dir = tempfile::tempdir().unwrap();
        let f1 = create_tmp_file(dir.path(), "ok", &["fine"]);
        let mut env = env_in(dir.path());

        let err = run::<Cat>(&[&f1, "missing"], &[], &mut env).unwrap_err();
        assert!(matches!(err, ShellError::FileAccess { path, .. } if path == "missing"));
    }

    #[test]
    fn test_cat_is_stateless() {
        let dir = tempfile::tempdir().unwrap();
        let f = create_tmp_file(dir.path(), "same", &["a", "b"]);
        let mut env = env_in(dir.path());

        let first = run::<Cat>(&[&f], &[], &mut env).unwrap();
        let piped: Vec<&str> = first.iter().map(String::as_str).collect();
        let second = run::<Cat>(&[&f], &piped, &mut env).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_wc_execute_from_pipe() {
        let mut env = Environment::new();
        assert_eq!(run::<Wc>(&[], &["some word"], &mut env).unwrap(), vec!["1 2 9\n"]);
        assert_eq!(run::<Wc>(&[], &["a", "b"], &mut env).unwrap(), vec!["2 2 2\n"]);
    }

    #[test]
    fn test_wc_execute_from_args() {
        let dir = tempfile::tempdir().unwrap();
        let f = create_tmp_file(dir.path(), "test_file", &["some test", "here"]);
        let mut env = env_in(dir.path());

        // 2 lines, 3 words, 14 bytes on disk ("some test\nhere")
        assert_eq!(run::<Wc>(&[&f], &[], &mut env).unwrap(), vec!["2 3 14\n"]);
    }

    #[test]
    fn test_wc_multiple_files_and_piped_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let f1 = create_tmp_file(dir.path(), "one", &["just one line"]);
        let f2 = create_tmp_file(dir.path(), "two", &["a b", "c"]);
        let mut env = env_in(dir.path());

        assert_eq!(
            run::<Wc>(&[&f1, &f2], &["One more"], &mut env).unwrap(),
            vec!["1 3 13\n", "2 3 5\n"]
        );
    }

    #[test]
    fn test_wc_requires_input() {
        let mut env = Environment::new();
        let err = run::<Wc>(&[], &[], &mut env).unwrap_err();
        assert!(matches!(err, ShellError::InvalidArguments { command, .. } if command == "wc"));
    }

    #[test]
    fn test_simple_grep_from_pipe() {
        let mut env = Environment::new();
        assert_eq!(
            run::<Grep>(&["hi"], &["this is test"], &mut env).unwrap(),
            vec!["this is test"]
        );
    }

    #[test]
    fn test_simple_grep_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let f = create_tmp_file(dir.path(), "test_file", &["some hi-test", "here"]);
        let mut env = env_in(dir.path());

        assert_eq!(
            run::<Grep>(&["hi", &f], &["piped is ignored"], &mut env).unwrap(),
            vec!["some hi-test"]
        );
    }

    #[test]
    fn test_grep_regexp() {
        let mut env = Environment::new();
        let piped = ["this is test", "or quite hot", "maysbe yes", "maybe not"];
        assert_eq!(
            run::<Grep>(&["s*s"], &piped, &mut env).unwrap(),
            vec!["this is test", "maysbe yes"]
        );
    }

    #[test]
    fn test_grep_w_flag() {
        let mut env = Environment::new();
        assert_eq!(
            run::<Grep>(&["-w", "t..t"], &["this is test", "tester is testing"], &mut env).unwrap(),
            vec!["this is test"]
        );
    }

    #[test]
    fn test_grep_i_flag() {
        let mut env = Environment::new();
        assert_eq!(
            run::<Grep>(&["-i", "t..t"], &["this is Test!", "TESTING"], &mut env).unwrap(),
            vec!["this is Test!", "TESTING"]
        );
    }

    #[test]
    fn test_grep_a_flag() {
        let mut env = Environment::new();
        let piped = ["this is test", "a", "b", "c", "testing"];
        assert_eq!(
            run::<Grep>(&["-A", "1", "t..t"], &piped, &mut env).unwrap(),
            vec!["this is test", "a", "testing"]
        );
    }

    #[test]
    fn test_grep_a_overlap_flag() {
        let mut env = Environment::new();
        let piped = ["this is test", "testing", "a", "b", "c"];
        assert_eq!(
            run::<Grep>(&["-A", "2", "t..t"], &piped, &mut env).unwrap(),
            vec!["this is test", "testing", "a", "b"]
        );
    }

    #[test]
    fn test_grep_flags_after_pattern() {
        let mut env = Environment::new();
        assert_eq!(
            run::<Grep>(&["target", "-i"], &["Target 1", "TaRgEt 2", "No match"], &mut env).unwrap(),
            vec!["Target 1", "TaRgEt 2"]
        );
    }

    #[test]
    fn test_grep_validator() {
        let mut env = Environment::new();
        let err = run::<Grep>(&["f", "-A", "2"], &[], &mut env).unwrap_err();
        assert!(matches!(err, ShellError::InvalidArguments { command, .. } if command == "grep"));
    }

    #[test]
    fn test_grep_invalid_regex() {
        let mut env = Environment::new();
        let err = run::<Grep>(&["("], &["x"], &mut env).unwrap_err();
        assert!(err.to_string().contains("invalid regex pattern"));
    }

    #[test]
    fn test_grep_dash_pattern() {
        let mut env = Environment::new();
        assert_eq!(
            run::<Grep>(&["-v", "-A", "1"], &["keep -v here", "next", "drop"], &mut env).unwrap(),
            vec!["keep -v here", "next"]
        );
    }

    #[test]
    fn test_grep_bad_flag_value() {
        let mut env = Environment::new();
        let err = run::<Grep>(&["-A", "many", "x"], &["x"], &mut env).unwrap_err();
        assert!(matches!(err, ShellError::InvalidArguments { .. }));
    }

    #[test]
    fn test_help_is_output() {
        let mut env = Environment::new();
        let out = run::<Grep>(&["--help"], &[], &mut env).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("Usage: grep"));
    }
}
