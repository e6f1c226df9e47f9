//! Terminal rendering. Site and find fields are routinely Hebrew, so column
//! math goes through `unicode-width` rather than char counts.

use chrono::Utc;
use console::style;
use once_cell::sync::Lazy;
use unicode_width::UnicodeWidthStr;

use trowelapp::commands::get::FindView;
use trowelapp::media::MediaKind;
use trowelapp::model::Find;
use trowelapp::sites::SiteEntry;
use trowelapp::user::User;

const DESCRIPTION_WIDTH: usize = 40;

static AGO: Lazy<timeago::Formatter> = Lazy::new(timeago::Formatter::new);

pub fn logged_in(user: &User) {
    println!("שלום, {}!", user.name);
    println!(
        "{} {} ({}) @ {}",
        style("Logged in:").green().bold(),
        user.name,
        user.role,
        user.site
    );
}

pub fn whoami(user: &User) {
    println!("{}  {}", style("name: ").dim(), user.name);
    println!("{}  {}", style("email:").dim(), user.email);
    println!("{}  {}", style("role: ").dim(), user.role);
    println!("{}  {}", style("site: ").dim(), user.site);
}

pub fn sites(sites: &[SiteEntry]) {
    let name_width = sites.iter().map(|s| s.name.width()).max().unwrap_or(0);
    for site in sites {
        let pad = " ".repeat(name_width.saturating_sub(site.name.width()));
        let location = if site.location.is_empty() {
            style("(no coordinates)").dim().to_string()
        } else {
            site.location.clone()
        };
        println!("{}{}  {}", site.name, pad, location);
    }
}

pub fn saved(find: &Find) {
    let verb = if find.updated_at.is_some() {
        "Updated"
    } else {
        "Recorded"
    };
    println!(
        "{} {}: {} ({} media)",
        style(verb).green().bold(),
        find.id,
        truncate_to_width(&find.description, DESCRIPTION_WIDTH),
        find.media.len()
    );
}

pub fn list(finds: &[Find]) {
    if finds.is_empty() {
        println!("No finds yet. Record one with `trowel add`.");
        return;
    }

    let id_width = finds.iter().map(|f| f.id.width()).max().unwrap_or(0);
    for find in finds {
        let id_pad = " ".repeat(id_width.saturating_sub(find.id.width()));
        let media = if find.media.is_empty() {
            String::new()
        } else {
            format!(" [{} media]", find.media.len())
        };
        println!(
            "{}{}  {}/{}  {}{}  {}",
            style(&find.id).cyan(),
            id_pad,
            find.plot,
            find.layer,
            truncate_to_width(&find.description, DESCRIPTION_WIDTH),
            media,
            style(age(find)).dim()
        );
    }
}

pub fn detail(view: &FindView) {
    let find = &view.find;
    println!("{}", style(&find.id).cyan().bold());
    println!("{}  {}", style("site:       ").dim(), find.site);
    println!("{}  {}", style("plot:       ").dim(), find.plot);
    println!("{}  {}", style("layer:      ").dim(), find.layer);
    println!("{}  {}", style("description:").dim(), find.description);
    println!("{}  {}", style("location:   ").dim(), find.location);
    println!("{}  {}", style("recorded:   ").dim(), find.datetime_text);
    println!("{}  {}", style("by:         ").dim(), find.created_by);
    if let Some(updated_at) = find.updated_at {
        println!(
            "{}  {}",
            style("edited:     ").dim(),
            updated_at.format("%d/%m/%Y %H:%M:%S")
        );
    }

    if view.media.is_empty() {
        return;
    }
    println!("{}", style("media:").dim());
    for item in &view.media {
        let kind = match item.reference.kind {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        };
        let missing = if item.available {
            String::new()
        } else {
            format!("  {}", style("(file missing)").red())
        };
        println!(
            "  {}  {}  {}{}",
            style(&item.reference.id).cyan(),
            kind,
            item.reference.name,
            missing
        );
    }
}

fn age(find: &Find) -> String {
    let elapsed = (Utc::now() - find.created_at).to_std().unwrap_or_default();
    AGO.convert(elapsed)
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut result = String::new();
    let mut current = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if current + w > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current += w;
    }
    result.push('…');
    result
}
