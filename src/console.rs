use std::str::FromStr;

use tracing::debug;

use crate::controller::{FormController, Outcome, Page};
use crate::error::{Error, Result};
use crate::form::FormField;
use crate::render;

pub const HELP: &str = "\
commands:
  set <field> [value]   set a form field (id, name, phone, address, rating, available, product_list)
  show                  print the form, flash message and last results
  create | update | retrieve | delete | search
  available             mark the supplier in the id field available
  clear                 empty the form
  help | quit";

/// One line typed at the console, mirroring the buttons on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(FormField, String),
    Show,
    Create,
    Update,
    Retrieve,
    Delete,
    Search,
    Clear,
    MakeAvailable,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        let command = match word.to_ascii_lowercase().as_str() {
            "set" => {
                let rest = rest.trim_start();
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Command::Set(field.parse()?, value.trim().to_string())
            }
            "show" => Command::Show,
            "create" => Command::Create,
            "update" => Command::Update,
            "retrieve" | "get" => Command::Retrieve,
            "delete" => Command::Delete,
            "search" => Command::Search,
            "clear" => Command::Clear,
            "available" | "make-available" => Command::MakeAvailable,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(Error::UnknownCommand(line.to_string())),
        };
        Ok(command)
    }
}

/// Drives a [`FormController`] from typed commands, holding the page between
/// them.
pub struct Console {
    controller: FormController,
    page: Page,
}

impl Console {
    pub fn new(controller: FormController) -> Self {
        Self {
            controller,
            page: Page::default(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Runs `command` and returns the text to print.
    pub async fn execute(&mut self, command: Command) -> Result<String> {
        debug!(command = ?command, "Executing console command");

        let form = &self.page.form;
        let outcome = match command {
            Command::Set(field, value) => {
                self.page.form = form.clone().with(field, value);
                return Ok(String::new());
            }
            Command::Show => return Ok(self.describe()),
            Command::Help => return Ok(HELP.to_string()),
            Command::Quit => return Ok(String::new()),
            Command::Create => self.controller.create(form).await?,
            Command::Update => self.controller.update(form).await?,
            Command::Retrieve => self.controller.retrieve(form).await,
            Command::Delete => self.controller.delete(form).await,
            Command::Search => self.controller.search(form).await,
            Command::MakeAvailable => self.controller.make_available(form).await,
            Command::Clear => self.controller.clear(),
        };

        self.page = self.page.apply(&outcome);
        Ok(match outcome {
            Outcome::Superseded(_) => String::new(),
            Outcome::Applied(_) => self.describe(),
        })
    }

    /// The page as text: form fields, flash region, then results.
    pub fn describe(&self) -> String {
        let mut lines: Vec<String> = FormField::ALL
            .iter()
            .map(|field| format!("{:<22} {}", field.element_id(), self.page.form.get(*field)))
            .collect();

        if let Some(flash) = &self.page.flash {
            lines.push(format!("flash: {flash}"));
        }
        if let Some(results) = &self.page.results {
            lines.push(String::new());
            lines.push(render::results_table_text(results));
        }
        lines.join("\n")
    }
}
