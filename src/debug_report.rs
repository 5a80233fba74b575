use chatemojis::{EmojiTree, Entry, Group, Requester};

mod style {
    const RESET: &str = "\x1b[0m";

    /// What a painted fragment stands for.
    #[derive(Clone, Copy)]
    pub enum Role {
        Heading,
        Label,
        Group,
        Emoji,
        Held,
        Skipped,
        Output,
    }

    impl Role {
        fn code(self) -> &'static str {
            match self {
                Role::Heading => "\x1b[90m",
                Role::Label => "\x1b[2m",
                Role::Group => "\x1b[1;36m",
                Role::Emoji => "\x1b[34m",
                Role::Held => "\x1b[32m",
                Role::Skipped => "\x1b[33m",
                Role::Output => "\x1b[1;32m",
            }
        }
    }

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, role: Role) -> String {
            if self.enabled { format!("{}{}{RESET}", role.code(), s.as_ref()) } else { s.as_ref().to_string() }
        }

        pub fn heading(&self, title: &str) -> String {
            self.paint(format!("━━━ {title} ━━━"), Role::Heading)
        }
    }
}

use style::{Palette, Role};

pub struct Report<'a> {
    pub tree: &'a EmojiTree,
    pub requester: &'a dyn Requester,
    pub color: bool,
}

impl Report<'_> {
    fn palette(&self) -> Palette {
        Palette::new(self.color)
    }

    /// One line summarising the load; the skipped entries themselves are logged.
    pub fn print_summary(&self) {
        let palette = self.palette();
        let skipped = self.tree.warnings().len();
        println!(
            "{} {}  │  {} {}  │  {} {}",
            palette.paint("groups:", Role::Label),
            palette.paint(self.tree.group_count().to_string(), Role::Emoji),
            palette.paint("emojis:", Role::Label),
            palette.paint(self.tree.emoji_count().to_string(), Role::Emoji),
            palette.paint("skipped:", Role::Label),
            palette.paint(skipped.to_string(), if skipped > 0 { Role::Skipped } else { Role::Label }),
        );
    }

    pub fn print_tree(&self) {
        let palette = self.palette();
        println!("\n{}", palette.heading("Groups"));
        print_group(self.tree.root(), self.tree, self.requester, 0, &palette);
    }

    pub fn print_list(&self) {
        let palette = self.palette();
        println!("\n{}", palette.heading("Emoticons"));

        let items = self.tree.display_items(self.requester);
        if items.is_empty() {
            println!("{}", palette.paint("  No emojis loaded", Role::Label));
            return;
        }
        for item in items {
            let line = format!("{}  {}", item, palette.paint(&item.permission, Role::Label));
            if item.permitted {
                println!("  {} {}", palette.paint("✓", Role::Held), line);
            } else {
                println!("  {} {}", palette.paint("✗", Role::Label), palette.paint(line, Role::Label));
            }
        }
    }

    pub fn print_parse(&self, input: &str, output: &str) {
        let palette = self.palette();
        println!("\n{}", palette.heading("Parse"));
        println!("  {} {}", palette.paint("in: ", Role::Label), input);
        println!("  {} {}", palette.paint("out:", Role::Label), palette.paint(output, Role::Output));
        println!();
    }
}

fn print_group(group: Group<'_>, tree: &EmojiTree, requester: &dyn Requester, depth: usize, palette: &Palette) {
    let indent = "  ".repeat(depth + 1);
    let held = tree.permissions().holds(requester, group.permission());
    println!(
        "{}{} {}",
        indent,
        palette.paint(group.name().unwrap_or("(default)"), Role::Group),
        fmt_permission(group.permission(), held, palette),
    );

    group.for_each(|entry| match entry {
        Entry::Group(child) => print_group(child, tree, requester, depth + 1, palette),
        Entry::Emoji(emoji) => {
            let held = tree.permissions().holds(requester, emoji.permission());
            println!(
                "{}  {} {} {}",
                indent,
                palette.paint(emoji.name(), Role::Emoji),
                palette.paint(format!("[{}] → {}", emoji.emoticons().join(" "), emoji.glyph()), Role::Label),
                fmt_permission(emoji.permission(), held, palette),
            );
        }
    });
}

fn fmt_permission(permission: &str, held: bool, palette: &Palette) -> String {
    palette.paint(permission, if held { Role::Held } else { Role::Label })
}
