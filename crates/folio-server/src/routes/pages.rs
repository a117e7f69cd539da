//! HTML pages for the Folio web UI.
//!
//! Every page shares one layout that shows the pending flash message above
//! the page content. All interpolated values go through [`escape`]; document
//! names in URLs are percent-encoded.

use std::fmt::Write as _;

/// Page head and opening body. `{{TITLE}}` is replaced per page.
const LAYOUT_HEAD: &str = r##"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"/><meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>{{TITLE}}</title>
<style>
*,*::before,*::after{box-sizing:border-box}
body{font-family:-apple-system,'Segoe UI',sans-serif;background:#FBF8F1;color:#2D1F0E;line-height:1.6;max-width:760px;margin:0 auto;padding:32px 24px}
a{color:#8A5A12}
h1{font-size:28px;margin:0 0 24px}
.flash{background:#FFF3C4;border:1px solid #E8C547;border-radius:8px;padding:10px 16px;margin-bottom:24px}
.documents{list-style:none;padding:0}
.documents li{display:flex;align-items:center;gap:12px;padding:8px 0;border-bottom:1px solid #EADFC8}
.documents li a.name{flex:1;font-weight:600}
.documents form{display:inline;margin:0}
.user-status{margin-top:32px;color:#7A6543}
textarea{width:100%;min-height:360px;font-family:ui-monospace,monospace;font-size:14px;padding:12px}
input[type=text],input[type=password]{padding:6px 10px;font-size:14px}
button,input[type=submit]{padding:6px 14px;font-size:14px;cursor:pointer}
</style></head>
<body>
"##;

const LAYOUT_FOOT: &str = "</body></html>\n";

/// Wrap `content` in the shared layout.
pub fn layout(title: &str, flash: Option<&str>, content: &str) -> String {
    let mut html = String::with_capacity(LAYOUT_HEAD.len() + content.len() + 256);
    html.push_str(&LAYOUT_HEAD.replace("{{TITLE}}", &escape(title)));
    if let Some(message) = flash {
        let _ = writeln!(html, r#"<p class="flash">{}</p>"#, escape(message));
    }
    html.push_str(content);
    html.push_str(LAYOUT_FOOT);
    html
}

/// Document index with the sign-in banner.
pub fn index_page(files: &[String], username: Option<&str>, flash: Option<&str>) -> String {
    let mut content = String::from("<h1>Documents</h1>\n<ul class=\"documents\">\n");
    for name in files {
        let href = urlencoding::encode(name);
        let label = escape(name);
        if username.is_some() {
            let _ = writeln!(
                content,
                r#"  <li><a class="name" href="/{href}">{label}</a> <a href="/{href}/edit">Edit</a> <form method="post" action="/{href}/delete"><button type="submit">Delete</button></form></li>"#
            );
        } else {
            let _ = writeln!(
                content,
                r#"  <li><a class="name" href="/{href}">{label}</a></li>"#
            );
        }
    }
    content.push_str("</ul>\n<p><a href=\"/new\">New Document</a></p>\n");

    match username {
        Some(user) => {
            let _ = writeln!(
                content,
                r#"<form method="post" action="/users/signout"><p class="user-status">Signed in as '{}'. <button type="submit">Sign Out</button></p></form>"#,
                escape(user)
            );
        }
        None => {
            content.push_str(
                "<p class=\"user-status\"><a href=\"/users/signin\">Sign In</a></p>\n",
            );
        }
    }

    layout("Folio", flash, &content)
}

/// Sign-in form, optionally pre-filled with the last submitted username.
pub fn signin_page(username: &str, flash: Option<&str>) -> String {
    let content = format!(
        r#"<h1>Sign In</h1>
<form method="post" action="/users/signin">
  <p><label for="username">Username</label><br/><input type="text" id="username" name="username" value="{}"/></p>
  <p><label for="password">Password</label><br/><input type="password" id="password" name="password"/></p>
  <p><button type="submit">Sign In</button></p>
</form>
"#,
        escape(username)
    );
    layout("Sign In · Folio", flash, &content)
}

/// New-document form.
pub fn new_page(file_name: &str, flash: Option<&str>) -> String {
    let content = format!(
        r#"<h1>New Document</h1>
<form method="post" action="/create">
  <p><label for="file_name">Add a new document:</label><br/><input type="text" id="file_name" name="file_name" value="{}"/></p>
  <p><input type="submit" value="Create"/> <button type="submit" name="cancel" value="1">Cancel</button></p>
</form>
"#,
        escape(file_name)
    );
    layout("New Document · Folio", flash, &content)
}

/// Edit form holding the raw document text.
pub fn edit_page(name: &str, text: &str, flash: Option<&str>) -> String {
    let content = format!(
        r#"<h1>Edit content of {label}:</h1>
<form method="post" action="/{href}/edit">
  <p><textarea name="text">{text}</textarea></p>
  <p><input type="submit" value="Save Changes"/> <button type="submit" name="cancel" value="1">Cancel</button></p>
</form>
"#,
        label = escape(name),
        href = urlencoding::encode(name),
        text = escape(text),
    );
    layout(&format!("Edit {name} · Folio"), flash, &content)
}

/// Escape text for HTML element content and double-quoted attributes.
///
/// Single quotes pass through: every attribute on these pages is
/// double-quoted, and messages quote names with `'`.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
