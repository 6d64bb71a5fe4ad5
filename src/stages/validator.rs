/// Checks a command's parameters before any work is done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validator {
    #[default]
    AlwaysTrue,
    /// Parameters or piped input must be present.
    RequiresAny,
    /// At least one parameter.
    RequiresArgs,
    /// Parameters plus the piped input (counted as one) must be at least two.
    AtLeastTwoWithPiped,
    OneOrZeroArguments,
}

impl Validator {
    /// `Err` carries a message for the user; the caller prefixes the command name.
    pub fn validate(self, args: &[String], piped: &[String]) -> Result<(), String> {
        let has_piped = !piped.is_empty();
        let ok = match self {
            Validator::AlwaysTrue => true,
            Validator::RequiresAny => !args.is_empty() || has_piped,
            Validator::RequiresArgs => !args.is_empty(),
            Validator::AtLeastTwoWithPiped => args.len() + usize::from(has_piped) >= 2,
            Validator::OneOrZeroArguments => args.len() <= 1,
        };
        if ok { Ok(()) } else { Err(self.message().to_string()) }
    }

    fn message(self) -> &'static str {
        match self {
            Validator::AlwaysTrue => "",
            Validator::RequiresAny => {
                "invalid arguments: command requires either args or piped to be present"
            }
            Validator::RequiresArgs => "invalid arguments: command requires args to be present",
            Validator::AtLeastTwoWithPiped => {
                "invalid arguments: command requires at least two inputs, counting piped"
            }
            Validator::OneOrZeroArguments => {
                "invalid arguments: command accepts at most one argument"
            }
        }
    }
}
