use crate::App;
use dominator::{Dom, events};
use futures_signals::signal::SignalExt;
use futures_signals::signal_vec::SignalVecExt;
use std::sync::Arc;
use tm3k_app::{SessionContext, Task, TaskEditor};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;

pub fn render(app: &Arc<App>, context: SessionContext) -> Dom {
    let editor = Arc::clone(&app.editor);

    html!("div", {
        .class("tm3k-tasks")
        .children(&mut [
            html!("header", {
                .children(&mut [
                    html!("h1", { .text("TASK MANAGER 3000") }),
                    html!("button", {
                        .class("tm3k-logout")
                        .text("Log out")
                        .event(move |_: events::Click| {
                            let context = context.clone();
                            spawn_local(async move {
                                context.log_out().await;
                            });
                        })
                    }),
                ])
            }),
            html!("p", {
                .class("tm3k-count")
                .text_signal(editor.count_signal().map(|count| format!("Tasks: {}", count)))
            }),
            html!("ul", {
                .class("tm3k-list")
                .children_signal_vec(editor.tasks_signal_vec().map(clone!(editor => move |task| {
                    render_row(&editor, task)
                })))
            }),
            render_new_task(&editor),
        ])
    })
}

fn render_row(editor: &Arc<TaskEditor>, task: Task) -> Dom {
    let id = task.id;

    html!("li", {
        .class("tm3k-row")
        .class(if task.completed { "tm3k-row-done" } else { "tm3k-row-open" })
        .child(html!("span", {
            .style("text-decoration", if task.completed { "line-through" } else { "none" })
            .text(&task.text)
        }))
        .child(html!("button", {
            .attr("title", "Mark as Done... or Not Done?")
            .text("Toggle")
            .event(clone!(editor => move |_: events::Click| editor.toggle(id)))
        }))
        .child(html!("button", {
            .attr("title", "WARNING: THIS DELETES THE TASK")
            .text("X")
            .event(clone!(editor => move |_: events::Click| editor.remove(id)))
        }))
    })
}

fn render_new_task(editor: &Arc<TaskEditor>) -> Dom {
    html!("div", {
        .class("tm3k-new-task")
        .child(html!("input" => HtmlInputElement, {
            .attr("type", "text")
            .attr("placeholder", "Type new task here... maybe?")
            .prop_signal("value", editor.draft_signal())
            .with_node!(element => {
                .event(clone!(editor => move |_: events::Input| {
                    editor.set_draft(element.value());
                }))
            })
            .event(clone!(editor => move |event: events::KeyDown| {
                if event.key() == "Enter" {
                    editor.submit();
                }
            }))
        }))
        .child(html!("button", {
            .text("DO IT!")
            .event(clone!(editor => move |_: events::Click| {
                editor.submit();
            }))
        }))
    })
}
