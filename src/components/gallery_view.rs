use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use crate::config::GalleryConfig;
use crate::model::gallery::{Gallery, GalleryAction};

#[derive(Properties, PartialEq, Clone)]
pub struct GalleryViewProps {
    pub config: GalleryConfig,
}

#[derive(Properties, PartialEq, Clone)]
struct ThumbnailProps {
    index: usize,
    path: String,
    fallback_color: String,
    on_open: Callback<usize>,
}

#[function_component]
fn Thumbnail(props: &ThumbnailProps) -> Html {
    let failed = use_state(|| false);
    let onerror = {
        let failed = failed.clone();
        let path = props.path.clone();
        Callback::from(move |_: Event| {
            log::warn!("gallery: failed to load {path}");
            failed.set(true);
        })
    };
    let onclick = {
        let on_open = props.on_open.clone();
        let index = props.index;
        Callback::from(move |_: MouseEvent| on_open.emit(index))
    };
    html! {
        <div class="gallery-item" {onclick}>
            if *failed {
                <div class="gallery-thumbnail gallery-fallback"
                    style={format!("background-color:{};", props.fallback_color)}></div>
            } else {
                <img class="gallery-thumbnail" src={props.path.clone()}
                    alt={format!("相册图片 {}", props.index + 1)} {onerror} />
            }
        </div>
    }
}

fn set_body_overflow(value: &str) {
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body());
    if let Some(body) = body {
        let _ = body.style().set_property("overflow", value);
    }
}

#[function_component]
pub fn GalleryView(props: &GalleryViewProps) -> Html {
    let gallery = {
        let cfg = props.config.clone();
        use_reducer(move || {
            Gallery::new(
                cfg.images,
                cfg.sort_order,
                cfg.allowed_extensions,
                &mut fastrand::Rng::new(),
            )
        })
    };
    let is_open = gallery.current().is_some();

    // Lightbox keys and scroll lock, only while open.
    {
        let dispatcher = gallery.dispatcher();
        use_effect_with(is_open, move |open| {
            let mut listener = None;
            if *open {
                set_body_overflow("hidden");
                if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
                    listener = Some(EventListener::new(&doc, "keydown", move |e| {
                        if let Some(e) = e.dyn_ref::<KeyboardEvent>() {
                            dispatcher.dispatch(GalleryAction::Key(e.key()));
                        }
                    }));
                }
            }
            let open = *open;
            move || {
                drop(listener);
                if open {
                    set_body_overflow("");
                }
            }
        });
    }

    let on_open = {
        let d = gallery.dispatcher();
        Callback::from(move |i: usize| d.dispatch(GalleryAction::Open(i)))
    };

    let grid = if gallery.is_empty() {
        html! {
            <div class="gallery-empty">
                <h3>{ "相册还是空的呢！" }</h3>
                <p>{ "请按照以下步骤添加照片：" }</p>
                <ol>
                    <li>{ "将您的照片放入 " }<code>{ "gallery" }</code>{ " 文件夹" }</li>
                    <li>{ "支持 JPG 和 PNG 格式" }</li>
                    <li>{ "在配置的 gallery.images 列表中登记文件名后刷新页面" }</li>
                </ol>
            </div>
        }
    } else {
        gallery
            .images()
            .iter()
            .enumerate()
            .map(|(i, path)| {
                html! {
                    <Thumbnail key={path.clone()} index={i} path={path.clone()}
                        fallback_color={props.config.fallback_color.clone()}
                        on_open={on_open.clone()} />
                }
            })
            .collect::<Html>()
    };

    let lightbox = match (gallery.current_path(), gallery.caption()) {
        (Some(path), Some(caption)) => {
            let d = gallery.dispatcher();
            let close = Callback::from(move |_: MouseEvent| d.dispatch(GalleryAction::Close));
            let d = gallery.dispatcher();
            let prev = Callback::from(move |e: MouseEvent| {
                e.stop_propagation();
                d.dispatch(GalleryAction::Previous)
            });
            let d = gallery.dispatcher();
            let next = Callback::from(move |e: MouseEvent| {
                e.stop_propagation();
                d.dispatch(GalleryAction::Next)
            });
            html! {
                <div class="fullscreen-view" style="display:flex;">
                    <button class="fullscreen-close" onclick={close.clone()}>{ "×" }</button>
                    <button class="fullscreen-nav nav-prev" onclick={prev}>{ "←" }</button>
                    <img class="fullscreen-image" src={path.to_string()} alt={caption.clone()} onclick={close} />
                    <button class="fullscreen-nav nav-next" onclick={next}>{ "→" }</button>
                    <div class="fullscreen-caption">{ caption }</div>
                </div>
            }
        }
        _ => html! {},
    };

    html! {
        <section id="gallery-container" class="gallery-container">
            <h2 class="section-title">{ "新年相册" }</h2>
            <div class="gallery-grid">{ grid }</div>
            { lightbox }
        </section>
    }
}
