//! Line commands accepted by the interactive loop.

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// New query; empty clears the search
    Search(String),
    /// Result number (1-based) or identifier
    Open(String),
    Close,
    Details,
    Add(f32),
    Delete(String),
    Watched,
    Results,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  search <text>     search movies (no text clears the search)
  open <n|id>       toggle details for result n or an IMDb id
  close             close the details view
  details           show details for the open movie
  add <0-10>        add the open movie to your watched list with your rating
  delete <id>       remove a movie from your watched list
  watched           list watched movies
  results           list current results
  help              show this help
  quit              exit";

pub fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_lowercase().as_str() {
        "search" | "s" | "/" => Ok(Input::Search(rest.to_string())),
        "open" | "o" => require(rest, "open <n|id>").map(|arg| Input::Open(arg.to_string())),
        "close" | "c" => Ok(Input::Close),
        "details" | "d" => Ok(Input::Details),
        "add" | "a" => {
            let raw = require(rest, "add <0-10>")?;
            raw.parse::<f32>()
                .map(Input::Add)
                .map_err(|_| format!("Invalid rating: {}", raw))
        }
        "delete" | "del" | "rm" => require(rest, "delete <id>").map(|arg| Input::Delete(arg.to_string())),
        "watched" | "w" => Ok(Input::Watched),
        "results" | "r" => Ok(Input::Results),
        "help" | "h" | "?" => Ok(Input::Help),
        "quit" | "q" | "exit" => Ok(Input::Quit),
        "" => Err("Type a command, or 'help'".to_string()),
        other => Err(format!("Unknown command: {} (try 'help')", other)),
    }
}

fn require<'a>(arg: &'a str, usage: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_keeps_inner_spacing() {
        assert_eq!(parse_input("search  star wars "), Ok(Input::Search("star wars".to_string())));
        assert_eq!(parse_input("search"), Ok(Input::Search(String::new())));
    }

    #[test]
    fn test_add_requires_numeric_rating() {
        assert_eq!(parse_input("add 8.5"), Ok(Input::Add(8.5)));
        assert!(parse_input("add").is_err());
        assert!(parse_input("add great").is_err());
    }

    #[test]
    fn test_aliases_and_errors() {
        assert_eq!(parse_input("o 2"), Ok(Input::Open("2".to_string())));
        assert_eq!(parse_input("Q"), Ok(Input::Quit));
        assert_eq!(parse_input("rm tt1"), Ok(Input::Delete("tt1".to_string())));
        assert!(parse_input("open").is_err());
        assert!(parse_input("dance").is_err());
        assert!(parse_input("   ").is_err());
    }
}
