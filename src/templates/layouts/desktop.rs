use maud::{html, Markup, DOCTYPE};

const NAV: [(&str, &str); 5] = [
    ("/", "Dashboard"),
    ("/properties/new", "New Property"),
    ("/data-studio", "Data Studio"),
    ("/analytics", "Analytics"),
    ("/agent-tools", "Agent Tools"),
];

fn head(title: &str) -> Markup {
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            title { (title) " | FloorIQ" }
            link rel="icon" href="/static/favicon/favicon.ico";
            link rel="stylesheet" href="/static/main.css";
            script src="/static/htmx.js" defer {};
        }
    }
}

/// App shell for the signed-in pages. `active` is the nav path to highlight.
pub fn desktop_layout(title: &str, active: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (head(title))
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    a href="/" class="brand" { "FloorIQ" }
                    nav {
                        ul {
                            @for (href, label) in NAV {
                                li {
                                    a href=(href) class=[(href == active).then_some("active")] { (label) }
                                }
                            }
                        }
                    }
                }
                main class="container" {
                    (content)
                }
            }
        }
    }
}

/// Chrome-less shell for shared reports opened by the public.
pub fn public_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (head(title))
            body class="public" {
                main class="container" {
                    (content)
                }
                footer { "Report generated by FloorIQ" }
            }
        }
    }
}
