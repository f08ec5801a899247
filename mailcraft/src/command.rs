//! Terminal commands.

use lesson::{EmailField, ImageStyle, TextStyle};

/// Error types for command parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (type 'help')")]
    Unknown(String),

    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Invalid argument for '{command}': {value}")]
    InvalidArgument { command: &'static str, value: String },
}

/// A parsed line of student input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Name(String),
    Set(EmailField, String),
    Style(TextStyle),
    Color(String),
    Attach,
    ImageStyle(ImageStyle),
    Template,
    Clear,
    AddContact { name: String, email: String },
    Favorite(String),
    Fix(u8),
    Dismiss(u8),
    /// Zero-based option index
    Answer(usize),
    Claim,
    Submit,
    Status,
    Show,
    Contacts,
    Export,
    Restart,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "" => return Err(CommandError::Empty),
            "name" => Command::Name(required(rest, "name", "a name")?.to_string()),
            "to" => Command::Set(EmailField::To, rest.to_string()),
            "subject" => Command::Set(EmailField::Subject, rest.to_string()),
            "body" => Command::Set(EmailField::Body, rest.to_string()),
            "cc" => Command::Set(EmailField::Cc, rest.to_string()),
            "bcc" => Command::Set(EmailField::Bcc, rest.to_string()),
            "bold" => Command::Style(TextStyle::Bold),
            "italic" => Command::Style(TextStyle::Italic),
            "underline" => Command::Style(TextStyle::Underline),
            "color" => Command::Color(required(rest, "color", "a color")?.to_string()),
            "attach" => Command::Attach,
            "picture" => match required(rest, "picture", "shadow or border")? {
                "shadow" => Command::ImageStyle(ImageStyle::Shadow),
                "border" => Command::ImageStyle(ImageStyle::Border),
                other => {
                    return Err(CommandError::InvalidArgument {
                        command: "picture",
                        value: other.to_string(),
                    })
                }
            },
            "template" => Command::Template,
            "clear" => Command::Clear,
            "contact" => {
                let rest = required(rest, "contact", "a name and an e-mail")?;
                let (name, email) = rest.rsplit_once(char::is_whitespace).ok_or(
                    CommandError::MissingArgument {
                        command: "contact",
                        expected: "a name and an e-mail",
                    },
                )?;
                Command::AddContact {
                    name: name.trim().to_string(),
                    email: email.to_string(),
                }
            }
            "favorite" => Command::Favorite(required(rest, "favorite", "a contact id")?.to_string()),
            "fix" => Command::Fix(number(rest, "fix")?),
            "dismiss" => Command::Dismiss(number(rest, "dismiss")?),
            "answer" => {
                let option: usize = number(rest, "answer")?;
                if option == 0 {
                    return Err(CommandError::InvalidArgument {
                        command: "answer",
                        value: rest.to_string(),
                    });
                }
                Command::Answer(option - 1)
            }
            "claim" => Command::Claim,
            "submit" | "send" => Command::Submit,
            "status" => Command::Status,
            "show" => Command::Show,
            "contacts" => Command::Contacts,
            "export" => Command::Export,
            "restart" => Command::Restart,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

fn number<T: std::str::FromStr>(rest: &str, command: &'static str) -> Result<T, CommandError> {
    required(rest, command, "a number")?
        .parse()
        .map_err(|_| CommandError::InvalidArgument {
            command,
            value: rest.to_string(),
        })
}

pub const HELP: &str = "\
name <text>              your name (intro only)
to|subject|body <text>   fill a field of the draft
cc|bcc <text>            copy recipients
bold|italic|underline    toggle text style
color <name>             text color
attach                   insert the picture
picture shadow|border    style the picture
template | clear         load the sample draft / clear everything
contact <name> <email>   add a contact
favorite <id>            star a contact
fix <n> | dismiss <n>    spelling suggestion for word n
answer <n>               quiz option n (from 1)
claim                    claim the certificate after the quiz
submit                   check this stage
status | show | contacts what is going on
export                   write the certificate
restart | quit";
