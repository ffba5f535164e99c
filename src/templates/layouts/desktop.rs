use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body style="font-family: Arial, sans-serif; padding: 20px; max-width: 1200px; margin: 0 auto; background: #f8f9fa;" {
                header style="margin-bottom: 20px;" {
                    h1 style="text-align: center; color: #2c3e50;" { "Tunisie Annonce Dashboard" }
                    p style="text-align: center; color: #7f8c8d;" { "Interactive real estate analytics" }
                    nav style="text-align: center;" {
                        a href="/" { "Dashboard" }
                        " · "
                        a href="/annonces" { "JSON" }
                    }
                }
                (content)
            }
        }
    }
}
