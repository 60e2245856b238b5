use portal_core::{
    ArticleDraft, ArticleMutation, CategoryDraft, CategoryMutation, ExportKind, Msg, SortOrder,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msg(Msg),
    Help,
    Quit,
}

pub const HELP: &str = "\
Listing:
  search <text>           filter by text (empty clears)
  category <id>|all       filter by category
  page <n> | next | prev  paginate
  source <name>|all       narrow the current page to one source
  sort latest|oldest      order the current page
  reset | refresh
  open <id> | close       article detail
Admin:
  dashboard | leave       open or close the dashboard
  scrape                  run the scraping job
  export news|stats|categories
  article-add <title> | <content> [| <category id>]
  article-delete <id>
  category-add <name> [| <description>]
  category-rename <id> | <name>
  category-delete <id>
Session:
  logout | help | quit";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let msg = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "search" => Msg::SearchTyped(rest.to_string()),
        "category" => Msg::CategorySelected(optional_arg(rest)),
        "page" => Msg::PageRequested(
            rest.parse()
                .map_err(|_| format!("'{rest}' is not a page number"))?,
        ),
        "next" => Msg::NextPageClicked,
        "prev" | "previous" => Msg::PreviousPageClicked,
        "source" => Msg::SourceSelected(optional_arg(rest)),
        "sort" => Msg::SortOrderChanged(
            SortOrder::parse(rest).ok_or_else(|| format!("unknown sort order '{rest}'"))?,
        ),
        "reset" => Msg::FiltersReset,
        "refresh" => Msg::RefreshRequested,
        "open" => Msg::ArticleOpened(required(rest, "article id")?),
        "close" => Msg::ArticleClosed,
        "dashboard" | "admin" => Msg::DashboardOpened,
        "leave" => Msg::DashboardClosed,
        "scrape" => Msg::RunJobClicked,
        "export" => Msg::ExportClicked(rest.parse::<ExportKind>()?),
        "article-add" => Msg::ArticleMutationRequested(ArticleMutation::Create(article_draft(rest)?)),
        "article-delete" | "delete" => Msg::ArticleMutationRequested(ArticleMutation::Delete {
            id: required(rest, "article id")?,
        }),
        "category-add" => {
            let mut fields = fields(rest);
            let name = fields.next().unwrap_or_default();
            if name.is_empty() {
                return Err("category-add needs a name".to_string());
            }
            Msg::CategoryMutationRequested(CategoryMutation::Create(CategoryDraft {
                name,
                description: fields.next().filter(|text| !text.is_empty()),
            }))
        }
        "category-rename" => {
            let mut fields = fields(rest);
            match (fields.next(), fields.next()) {
                (Some(id), Some(name)) if !id.is_empty() && !name.is_empty() => {
                    Msg::CategoryMutationRequested(CategoryMutation::Update {
                        id,
                        draft: CategoryDraft {
                            name,
                            description: None,
                        },
                    })
                }
                _ => return Err("usage: category-rename <id> | <name>".to_string()),
            }
        }
        "category-delete" => Msg::CategoryMutationRequested(CategoryMutation::Delete {
            id: required(rest, "category id")?,
        }),
        "logout" => Msg::LoggedOut,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(Command::Msg(msg)))
}

fn optional_arg(rest: &str) -> Option<String> {
    match rest {
        "" => None,
        all if all.eq_ignore_ascii_case("all") => None,
        value => Some(value.to_string()),
    }
}

fn required(rest: &str, what: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("missing {what}"))
    } else {
        Ok(rest.to_string())
    }
}

fn fields(rest: &str) -> impl Iterator<Item = String> + '_ {
    rest.split('|').map(|field| field.trim().to_string())
}

fn article_draft(rest: &str) -> Result<ArticleDraft, String> {
    let mut fields = fields(rest);
    let (title, content) = match (fields.next(), fields.next()) {
        (Some(title), Some(content)) if !title.is_empty() && !content.is_empty() => {
            (title, content)
        }
        _ => return Err("usage: article-add <title> | <content> [| <category id>]".to_string()),
    };
    Ok(ArticleDraft {
        title,
        summary: None,
        content,
        category_id: fields.next().filter(|id| !id.is_empty()),
        is_published: true,
    })
}
