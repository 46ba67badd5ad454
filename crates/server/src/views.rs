//! Server-side HTML for the sidebar layout and the detail pane.
//!
//! Navigation state is passed in explicitly; the server always renders with
//! the state of the request it is answering.

use std::fmt::Write as _;

use shared::{
    domain::{
        contact_path, edit_contact_path, Contact, LinkStatus, NavigationState, FAVORITE_MARKER,
        NO_NAME_PLACEHOLDER,
    },
    protocol::ContactListing,
};

const STYLESHEET: &str = include_str!("../assets/app.css");

const SEARCH_SCRIPT: &str = r#"
const q = document.getElementById("q");
q.addEventListener("input", (event) => {
  document.getElementById("search-spinner").hidden = false;
  event.currentTarget.form.requestSubmit();
});
document.querySelectorAll("form[data-confirm]").forEach((form) => {
  form.addEventListener("submit", (event) => {
    if (!confirm(form.dataset.confirm)) event.preventDefault();
  });
});
"#;

#[derive(Debug, Clone, Copy)]
pub enum Detail<'a> {
    Index,
    Contact(&'a Contact),
    Edit(&'a Contact),
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutView<'a> {
    pub listing: &'a ContactListing,
    pub current_path: &'a str,
    pub navigation: &'a NavigationState,
    pub detail: Detail<'a>,
}

pub fn render_layout(view: &LayoutView<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Contacts</title>\n");
    let _ = writeln!(html, "<style>{STYLESHEET}</style>");
    html.push_str("</head>\n<body>\n");

    render_sidebar(&mut html, view);

    let detail_class = if view.navigation.is_pending() {
        "loading"
    } else {
        ""
    };
    let _ = writeln!(html, "<div id=\"detail\" class=\"{detail_class}\">");
    match view.detail {
        Detail::Index => render_index(&mut html),
        Detail::Contact(contact) => render_contact(&mut html, contact),
        Detail::Edit(contact) => render_edit_form(&mut html, contact),
    }
    html.push_str("</div>\n");

    let _ = writeln!(html, "<script>{SEARCH_SCRIPT}</script>");
    html.push_str("</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String, view: &LayoutView<'_>) {
    let q = view.listing.q.as_deref().unwrap_or_default();

    html.push_str("<div id=\"sidebar\">\n<h1>Contacts</h1>\n<div>\n");
    html.push_str("<form id=\"search-form\" role=\"search\" method=\"get\" action=\"/\">\n");
    let _ = writeln!(
        html,
        "<input id=\"q\" aria-label=\"Search contacts\" placeholder=\"Search\" type=\"search\" name=\"q\" value=\"{}\"{}>",
        escape_html(q),
        if q.is_empty() { "" } else { " autofocus" }
    );
    html.push_str("<div id=\"search-spinner\" aria-hidden=\"true\" hidden></div>\n</form>\n");
    html.push_str("<form method=\"post\" action=\"/\">\n<button type=\"submit\">New</button>\n</form>\n");
    html.push_str("</div>\n<nav>\n");

    if view.listing.contacts.is_empty() {
        html.push_str("<p><i>No contacts</i></p>\n");
    } else {
        html.push_str("<ul>\n");
        for contact in &view.listing.contacts {
            render_contact_link(html, contact, view.current_path, view.navigation);
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</nav>\n</div>\n");
}

fn render_contact_link(
    html: &mut String,
    contact: &Contact,
    current_path: &str,
    navigation: &NavigationState,
) {
    let href = contact_path(&contact.id);
    let status = LinkStatus::for_link(&href, current_path, navigation);
    let _ = write!(
        html,
        "<li><a href=\"{}\" class=\"{}\">",
        escape_html(&href),
        status.css_class()
    );
    match contact.full_name() {
        Some(name) => html.push_str(&escape_html(&name)),
        None => {
            let _ = write!(html, "<i>{NO_NAME_PLACEHOLDER}</i>");
        }
    }
    if contact.favorite {
        let _ = write!(html, " <span>{FAVORITE_MARKER}</span>");
    }
    html.push_str("</a></li>\n");
}

fn render_index(html: &mut String) {
    html.push_str("<p id=\"index-page\">Select a contact from the list, or create a new one.</p>\n");
}

fn render_contact(html: &mut String, contact: &Contact) {
    let path = contact_path(&contact.id);
    html.push_str("<div id=\"contact\">\n<div>\n");
    if let Some(avatar) = contact.avatar.as_deref() {
        let _ = writeln!(
            html,
            "<img alt=\"{} avatar\" src=\"{}\">",
            escape_html(&contact.display_name()),
            escape_html(avatar)
        );
    }
    html.push_str("</div>\n<div>\n<h1>");
    match contact.full_name() {
        Some(name) => html.push_str(&escape_html(&name)),
        None => {
            let _ = write!(html, "<i>{NO_NAME_PLACEHOLDER}</i>");
        }
    }
    let (next_favorite, label, marker) = if contact.favorite {
        ("false", "Remove from favorites", "★")
    } else {
        ("true", "Add to favorites", "☆")
    };
    let _ = writeln!(
        html,
        " <form method=\"post\" action=\"{}/favorite\"><button name=\"favorite\" value=\"{next_favorite}\" aria-label=\"{label}\">{marker}</button></form></h1>",
        escape_html(&path)
    );

    if let Some(twitter) = contact.twitter.as_deref() {
        let handle = twitter.trim_start_matches('@');
        let _ = writeln!(
            html,
            "<p><a href=\"https://twitter.com/{}\">{}</a></p>",
            escape_html(handle),
            escape_html(twitter)
        );
    }
    if let Some(notes) = contact.notes.as_deref() {
        let _ = writeln!(html, "<p>{}</p>", escape_html(notes));
    }

    html.push_str("<div>\n");
    let _ = writeln!(
        html,
        "<form method=\"get\" action=\"{}\"><button type=\"submit\">Edit</button></form>",
        escape_html(&edit_contact_path(&contact.id))
    );
    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"{}/destroy\" data-confirm=\"Please confirm you want to delete this record.\"><button type=\"submit\">Delete</button></form>",
        escape_html(&path)
    );
    html.push_str("</div>\n</div>\n</div>\n");
}

fn render_edit_form(html: &mut String, contact: &Contact) {
    let field = |value: &Option<String>| escape_html(value.as_deref().unwrap_or_default());

    let _ = writeln!(
        html,
        "<form id=\"contact-form\" method=\"post\" action=\"{}\">",
        escape_html(&edit_contact_path(&contact.id))
    );
    let _ = writeln!(
        html,
        "<p><span>Name</span>\
         <input aria-label=\"First name\" name=\"first\" type=\"text\" placeholder=\"First\" value=\"{}\">\
         <input aria-label=\"Last name\" name=\"last\" type=\"text\" placeholder=\"Last\" value=\"{}\"></p>",
        field(&contact.first),
        field(&contact.last)
    );
    let _ = writeln!(
        html,
        "<label><span>Twitter</span><input name=\"twitter\" type=\"text\" placeholder=\"@jack\" value=\"{}\"></label>",
        field(&contact.twitter)
    );
    let _ = writeln!(
        html,
        "<label><span>Avatar URL</span><input aria-label=\"Avatar URL\" name=\"avatar\" type=\"text\" placeholder=\"https://example.com/avatar.jpg\" value=\"{}\"></label>",
        field(&contact.avatar)
    );
    let _ = writeln!(
        html,
        "<label><span>Notes</span><textarea name=\"notes\" rows=\"6\">{}</textarea></label>",
        field(&contact.notes)
    );
    let _ = writeln!(
        html,
        "<p><button type=\"submit\">Save</button> <a href=\"{}\">Cancel</a></p>",
        escape_html(&contact_path(&contact.id))
    );
    html.push_str("</form>\n");
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
