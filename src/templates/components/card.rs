use maud::{html, Markup};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" style="padding: 15px; margin-bottom: 20px; background: #fff; border-radius: 5px; box-shadow: 0 1px 3px rgba(0,0,0,0.1);" {
            h3 style="color: #2c3e50; margin-top: 0;" { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// Small headline number, one of the summary row.
pub fn stat_card(label: &str, value: &str) -> Markup {
    html! {
        div class="card" style="width: 24%; display: inline-block; padding: 15px; text-align: center; box-sizing: border-box;" {
            h4 style="color: #3498db; margin-bottom: 5px;" { (label) }
            h2 style="color: #2c3e50; margin-top: 0;" { (value) }
        }
    }
}
