//! Server-rendered HTML pages.
//!
//! Pages are assembled with `format!` around a shared [`layout`]. Every
//! user-supplied string goes through [`escape`].

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::models::{DailyEntry, EntryWithWorker, Invoice, Role, User};

use super::{breakdown_lines, format_money};

/// Escapes text for HTML element content and quoted attributes.
///
/// # Example
///
/// ```
/// use courier_ledger::render::html::escape;
///
/// assert_eq!(escape(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
/// ```
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Per-request page chrome: who is looking and what flash messages to show.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// The logged-in user, if any.
    pub viewer: Option<&'a User>,
    /// Messages queued by the previous request.
    pub flashes: &'a [String],
}

/// Values to pre-fill the invoice form with.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFormValues {
    /// Selected worker id.
    pub user_id: Option<i64>,
    /// Period start as typed.
    pub start: String,
    /// Period end as typed.
    pub end: String,
    /// Van rent as typed.
    pub van_rent: String,
}

/// Wraps a page body in the shared document shell and navigation.
pub fn layout(ctx: &PageContext<'_>, title: &str, body: &str) -> String {
    let mut nav = String::new();
    if let Some(user) = ctx.viewer {
        nav.push_str(r#"<nav><a href="/">Entries</a> | <a href="/entry/new">New entry</a> | <a href="/invoice">Invoice</a>"#);
        if user.role == Role::Admin {
            nav.push_str(r#" | <a href="/admin/users">Users</a>"#);
        }
        let _ = write!(
            nav,
            r#" | <span>{} ({})</span> | <a href="/logout">Log out</a></nav>"#,
            escape(&user.name),
            user.role
        );
    }

    let flashes: String = ctx
        .flashes
        .iter()
        .map(|m| format!(r#"<p class="flash">{}</p>"#, escape(m)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - Courier Ledger</title>
</head>
<body>
{nav}
<main>
<h1>{title}</h1>
{flashes}
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    )
}

/// The login form, optionally with an error message.
pub fn login_page(ctx: &PageContext<'_>, error: Option<&str>) -> String {
    let error_html = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
        .unwrap_or_default();

    let body = format!(
        r#"{error_html}
<form method="post" action="/login">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>"#
    );
    layout(ctx, "Log in", &body)
}

fn entry_row(entry: &DailyEntry, worker_name: Option<&str>, with_comment_form: bool) -> String {
    let worker_cell = worker_name
        .map(|name| format!("<td>{}</td>", escape(name)))
        .unwrap_or_default();
    let comment_cell = if with_comment_form {
        format!(
            r#"<td><form method="post" action="/admin/entry/{id}/comment"><input name="admin_comment" value="{comment}"><button type="submit">Save</button></form></td>"#,
            id = entry.id,
            comment = escape(&entry.admin_comment),
        )
    } else {
        format!("<td>{}</td>", escape(&entry.admin_comment))
    };

    format!(
        r#"<tr>{worker_cell}<td>{date}</td><td>{packages}</td><td>{notes}</td>{comment_cell}<td><a href="/entry/{id}/edit">Edit</a></td></tr>"#,
        date = entry.work_date,
        packages = entry.packages,
        notes = escape(&entry.notes),
        id = entry.id,
    )
}

/// A worker's own entries.
pub fn worker_dashboard(ctx: &PageContext<'_>, entries: &[DailyEntry]) -> String {
    let rows: String = entries.iter().map(|e| entry_row(e, None, false)).collect();
    let body = format!(
        r#"<p><a href="/entry/new">Record today's packages</a></p>
<table>
<thead><tr><th>Date</th><th>Packages</th><th>Notes</th><th>Admin comment</th><th></th></tr></thead>
<tbody>{rows}</tbody>
</table>"#
    );
    layout(ctx, "My entries", &body)
}

fn user_rows(users: &[User]) -> String {
    users
        .iter()
        .map(|u| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}%</td></tr>",
                escape(&u.name),
                escape(&u.email),
                u.role,
                format_money(u.price_per_pkg),
                (u.super_rate * rust_decimal::Decimal::ONE_HUNDRED).normalize(),
            )
        })
        .collect()
}

/// Recent entries across all workers plus the user list.
pub fn admin_dashboard(
    ctx: &PageContext<'_>,
    entries: &[EntryWithWorker],
    users: &[User],
) -> String {
    let rows: String = entries
        .iter()
        .map(|e| entry_row(&e.entry, Some(e.worker_name.as_str()), true))
        .collect();

    let body = format!(
        r#"<h2>Recent entries</h2>
<table>
<thead><tr><th>Worker</th><th>Date</th><th>Packages</th><th>Notes</th><th>Admin comment</th><th></th></tr></thead>
<tbody>{rows}</tbody>
</table>
<h2>Users</h2>
<table>
<thead><tr><th>Name</th><th>Email</th><th>Role</th><th>Price/pkg</th><th>Super</th></tr></thead>
<tbody>{users}</tbody>
</table>"#,
        users = user_rows(users),
    );
    layout(ctx, "Admin dashboard", &body)
}

fn worker_options(workers: &[User], selected: Option<i64>) -> String {
    workers
        .iter()
        .map(|u| {
            format!(
                r#"<option value="{id}"{sel}>{name}</option>"#,
                id = u.id,
                sel = if selected == Some(u.id) { " selected" } else { "" },
                name = escape(&u.name),
            )
        })
        .collect()
}

/// The create/edit entry form.
///
/// `workers` is shown as an owner picker only when creating as an admin.
pub fn entry_form(
    ctx: &PageContext<'_>,
    entry: Option<&DailyEntry>,
    default_date: NaiveDate,
    workers: Option<&[User]>,
) -> String {
    let (action, title) = match entry {
        Some(e) => (format!("/entry/{}/edit", e.id), "Edit entry"),
        None => ("/entry/new".to_string(), "New entry"),
    };
    let work_date = entry.map_or(default_date, |e| e.work_date);
    let packages = entry.map_or(0, |e| e.packages);
    let notes = entry.map(|e| escape(&e.notes)).unwrap_or_default();

    let owner_picker = match (entry, workers) {
        (None, Some(workers)) => format!(
            r#"<label>Worker <select name="user_id"><option value="">Myself</option>{}</select></label>"#,
            worker_options(workers, None)
        ),
        _ => String::new(),
    };

    let body = format!(
        r#"<form method="post" action="{action}">
{owner_picker}
<label>Date <input type="date" name="work_date" value="{work_date}" required></label>
<label>Packages <input type="number" name="packages" min="0" step="1" value="{packages}"></label>
<label>Notes <textarea name="notes">{notes}</textarea></label>
<button type="submit">Save</button>
</form>"#
    );
    layout(ctx, title, &body)
}

/// User list with the create-user form and per-user rate editors.
pub fn admin_users_page(ctx: &PageContext<'_>, users: &[User]) -> String {
    let editors: String = users
        .iter()
        .map(|u| {
            format!(
                r#"<tr><td>{name}</td><td>{email}</td><td><form method="post" action="/admin/users/{id}">
<select name="role"><option value="worker"{w}>worker</option><option value="admin"{a}>admin</option></select>
<input name="price_per_pkg" value="{price}" size="6">
<input name="super_rate" value="{rate}" size="6">
<button type="submit">Update</button></form></td></tr>"#,
                name = escape(&u.name),
                email = escape(&u.email),
                id = u.id,
                w = if u.role == Role::Worker { " selected" } else { "" },
                a = if u.role == Role::Admin { " selected" } else { "" },
                price = u.price_per_pkg,
                rate = u.super_rate,
            )
        })
        .collect();

    let body = format!(
        r#"<h2>Create user</h2>
<form method="post" action="/admin/users">
<label>Name <input name="name" required></label>
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<label>Role <select name="role"><option value="worker">worker</option><option value="admin">admin</option></select></label>
<label>Price per package <input name="price_per_pkg" value="1.0"></label>
<label>Super rate <input name="super_rate" value="0.115"></label>
<button type="submit">Create</button>
</form>
<h2>Users</h2>
<table>
<thead><tr><th>Name</th><th>Email</th><th>Role / price per package / super rate</th></tr></thead>
<tbody>{editors}</tbody>
</table>"#
    );
    layout(ctx, "Users", &body)
}

/// The invoice form, plus the computed breakdown when one is present.
pub fn invoice_page(
    ctx: &PageContext<'_>,
    workers: &[User],
    form: &InvoiceFormValues,
    invoice: Option<&Invoice>,
) -> String {
    let mut result_html = String::new();
    if let Some(invoice) = invoice {
        let rows: String = breakdown_lines(&invoice.breakdown)
            .iter()
            .map(|l| format!("<tr><th>{}</th><td>{}</td></tr>", escape(&l.label), escape(&l.value)))
            .collect();
        let warnings: String = invoice
            .warnings
            .iter()
            .map(|w| format!(r#"<li class="warning">{}</li>"#, escape(&w.message)))
            .collect();
        let pdf_href = format!(
            "/invoice/pdf?user_id={}&start={}&end={}&van_rent={}",
            invoice.worker_id, invoice.period.start, invoice.period.end, invoice.breakdown.van_rent
        );

        let _ = write!(
            result_html,
            r#"<section class="invoice">
<h2>Contractor: {name} ({email})</h2>
<p>Period: {start} to {end}</p>
<h3>Breakdown:</h3>
<table>{rows}</table>
<ul>{warnings}</ul>
<p><a href="{pdf_href}">Download PDF</a></p>
</section>"#,
            name = escape(&invoice.worker_name),
            email = escape(&invoice.worker_email),
            start = invoice.period.start,
            end = invoice.period.end,
            pdf_href = escape(&pdf_href),
        );
    }

    let body = format!(
        r#"<form method="post" action="/invoice">
<label>Worker <select name="user_id">{options}</select></label>
<label>From <input type="date" name="start" value="{start}" required></label>
<label>To <input type="date" name="end" value="{end}" required></label>
<label>Van rent <input name="van_rent" value="{van_rent}"></label>
<button type="submit">Calculate</button>
</form>
{result_html}"#,
        options = worker_options(workers, form.user_id),
        start = escape(&form.start),
        end = escape(&form.end),
        van_rent = escape(&form.van_rent),
    );
    layout(ctx, "Invoice", &body)
}

/// A minimal error page.
pub fn error_page(ctx: &PageContext<'_>, title: &str, message: &str) -> String {
    layout(
        ctx,
        title,
        &format!(r#"<p class="error">{}</p><p><a href="/">Back</a></p>"#, escape(message)),
    )
}
