//! Bề mặt vẽ SVG cho timeline trong môi trường WebAssembly.

mod setup;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::setup::timeline_setup;
    use crate::styles;
    use activity_timeline_core::{
        BandGeometry, BarClickHandler, BarGeometry, CategoryAxis, Container, Event,
        LegendLayout, OverlayState, PopoverContent, RenderPlan, TimeAxis, Timeline,
    };
    use activity_timeline_json::{events_from_value, FieldMapping, JsTimelineConfig};
    use serde::Serialize;
    use serde_wasm_bindgen::{from_value, Serializer};
    use wasm_bindgen::prelude::*;
    use web_sys::{console, Document, Element, Window};
    use yew::prelude::*;

    /// Timeline dùng chung giữa component và các callback sự kiện chuột.
    #[derive(Clone)]
    pub struct TimelineHandle(Rc<RefCell<Timeline>>);

    impl PartialEq for TimelineHandle {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct TimelineViewProps {
        pub timeline: TimelineHandle,
    }

    #[function_component(TimelineView)]
    fn timeline_view(props: &TimelineViewProps) -> Html {
        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        let redraw = use_force_update();
        let timeline = props.timeline.0.borrow();
        let Some(plan) = timeline.plan() else {
            return html! { <div class="atl-root atl-empty">{"Chưa có dữ liệu"}</div> };
        };

        // Click ra ngoài thanh chỉ đóng popover của chính timeline này.
        let on_root_click = {
            let handle = props.timeline.clone();
            let redraw = redraw.clone();
            Callback::from(move |_: MouseEvent| {
                handle.0.borrow_mut().click_outside();
                redraw.force_update();
            })
        };

        html! {
            <div class="atl-root" onclick={on_root_click}>
                <svg width={px(plan.canvas.width)} height={px(plan.canvas.height)}>
                    <g transform={translate(plan.margin.left, plan.margin.top)}>
                        { render_time_axis(&plan.time_axis, plan) }
                        { render_category_axis(&plan.category_axis, plan) }
                        { for plan.bands.iter().map(render_band) }
                        { for plan.bars.iter().enumerate().map(|(index, bar)| {
                            render_bar(index, bar, &props.timeline, &redraw)
                        }) }
                        { render_legend(&plan.legend) }
                    </g>
                </svg>
                { render_overlays(timeline.overlays()) }
            </div>
        }
    }

    fn render_time_axis(axis: &TimeAxis, plan: &RenderPlan) -> Html {
        html! {
            <g class="x axis" transform={translate(0.0, axis.y)}>
                <line x2={px(plan.plot.width)} />
                { for axis.ticks.iter().map(|tick| html! {
                    <g class="tick" transform={translate(tick.offset, 0.0)}>
                        <line y2="6" />
                        <text y="9" dy=".71em" text-anchor="middle">{ tick.label.clone() }</text>
                    </g>
                }) }
            </g>
        }
    }

    fn render_category_axis(axis: &CategoryAxis, plan: &RenderPlan) -> Html {
        html! {
            <g class="y axis">
                <line y2={px(plan.plot.height)} />
                { for axis.ticks.iter().map(|tick| html! {
                    <g class="tick" transform={translate(0.0, tick.offset)}>
                        <line x2="-6" />
                        <text x="-9" dy=".32em" text-anchor="end">{ tick.label.clone() }</text>
                    </g>
                }) }
            </g>
        }
    }

    fn render_band(band: &BandGeometry) -> Html {
        html! {
            <g class="atl-band" transform={translate(0.0, band.y)}>
                <line class="atl-separator" x2={px(band.separator_width)} />
            </g>
        }
    }

    fn render_bar(
        index: usize,
        bar: &BarGeometry,
        handle: &TimelineHandle,
        redraw: &UseForceUpdateHandle,
    ) -> Html {
        let on_over = {
            let handle = handle.clone();
            let redraw = redraw.clone();
            Callback::from(move |event: MouseEvent| {
                handle.0.borrow_mut().hover(
                    index,
                    f64::from(event.client_x()),
                    f64::from(event.client_y()),
                );
                redraw.force_update();
            })
        };

        let on_out = {
            let handle = handle.clone();
            let redraw = redraw.clone();
            Callback::from(move |_: MouseEvent| {
                handle.0.borrow_mut().leave();
                redraw.force_update();
            })
        };

        let on_click = {
            let handle = handle.clone();
            let redraw = redraw.clone();
            Callback::from(move |event: MouseEvent| {
                // Mượn chỉ để lấy handler; handler JS có thể gọi lại vào timeline.
                let target = handle.0.borrow().click_target(index);
                let Some((handler, record)) = target else {
                    return;
                };
                event.stop_propagation();
                let (x, y) = (f64::from(event.client_x()), f64::from(event.client_y()));
                if let Some(popover) = handler(&record, x, y) {
                    handle
                        .0
                        .borrow_mut()
                        .open_popover(popover.header, popover.content, x, y);
                }
                redraw.force_update();
            })
        };

        html! {
            <rect
                class="atl-bar"
                data-legend={bar.tag.clone()}
                x={px(bar.x)}
                y={px(bar.y)}
                width={px(bar.width)}
                height={px(bar.height)}
                fill={bar.fill.clone()}
                onmouseover={on_over}
                onmouseout={on_out}
                onclick={on_click}
            />
        }
    }

    fn render_legend(legend: &LegendLayout) -> Html {
        let bounds = legend.bounds;
        html! {
            <g
                class="legend"
                transform={translate(0.0, legend.origin_y)}
                style={format!("font-size:{}px", legend.font_size)}
            >
                <rect
                    class="legend-box"
                    x={px(bounds.x)}
                    y={px(bounds.y)}
                    width={px(bounds.width)}
                    height={px(bounds.height)}
                />
                { for legend.items.iter().map(|item| html! {
                    <g class="legend-item">
                        <text x={px(item.text_x)} y={px(item.text_y)}>{ item.tag.clone() }</text>
                        <rect
                            x={px(item.swatch.x)}
                            y={px(item.swatch.y)}
                            width={px(item.swatch.width)}
                            height={px(item.swatch.height)}
                            fill={item.color.clone()}
                        />
                    </g>
                }) }
            </g>
        }
    }

    fn render_overlays(overlays: &OverlayState) -> Html {
        let tooltip = overlays.tooltip().map(|tooltip| {
            let style = format!(
                "left:{}px;top:{}px;background-color:{};opacity:{};transition:opacity {}ms",
                tooltip.left,
                tooltip.top,
                tooltip.background,
                tooltip.fade.opacity,
                tooltip.fade.duration_ms
            );
            html! {
                <div class="atl-tooltip" {style}>
                    <strong>{ tooltip.title.clone() }</strong>
                    <br />
                    { tooltip.time_range.clone() }
                </div>
            }
        });

        let popover = overlays.popover().map(|popover| {
            let style = format!(
                "left:{}px;top:{}px;opacity:{};transition:opacity {}ms",
                popover.left, popover.top, popover.fade.opacity, popover.fade.duration_ms
            );
            let on_click = Callback::from(|event: MouseEvent| event.stop_propagation());
            html! {
                <div class="atl-popover" {style} onclick={on_click}>
                    <div class="header">{ popover.header.clone() }</div>
                    <div class="content">{ popover.content.clone() }</div>
                </div>
            }
        });

        html! {
            <>
                { for tooltip }
                { for popover }
            </>
        }
    }

    fn px(value: f64) -> String {
        value.to_string()
    }

    fn translate(x: f64, y: f64) -> String {
        format!("translate({x},{y})")
    }

    /// Bọc hàm JS `(record, pageX, pageY)`; nếu hàm trả về
    /// `{ header, content }` thì nội dung đó được mở thành popover.
    fn js_click_handler(function: js_sys::Function) -> BarClickHandler {
        Rc::new(move |event: &Event, x: f64, y: f64| {
            let record = match event.serialize(&Serializer::json_compatible()) {
                Ok(record) => record,
                Err(err) => {
                    console::error_1(&JsValue::from(err));
                    return None;
                }
            };
            match function.call3(
                &JsValue::NULL,
                &record,
                &JsValue::from_f64(x),
                &JsValue::from_f64(y),
            ) {
                Ok(result) if result.is_object() => from_value::<PopoverContent>(result).ok(),
                Ok(_) => None,
                Err(err) => {
                    console::error_1(&err);
                    None
                }
            }
        })
    }

    #[wasm_bindgen]
    pub fn mount_timeline_view(
        selector: &str,
        records: JsValue,
        config: Option<JsValue>,
        bar_clicked: Option<js_sys::Function>,
    ) -> Result<(), JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        let js_cfg: JsTimelineConfig = match config {
            Some(config) => from_value(config)?,
            None => JsTimelineConfig::default(),
        };
        let (config, callbacks) = timeline_setup(&js_cfg, bar_clicked.map(js_click_handler));

        let records: serde_json::Value = from_value(records)?;
        let events = events_from_value(&records, &FieldMapping::from_config(&config))
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        let bounds = target.get_bounding_client_rect();
        let mut timeline = Timeline::new(Container::new(bounds.width(), bounds.height()), config)
            .with_callbacks(callbacks);
        timeline
            .update(Some(events.as_slice()))
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        let timeline = TimelineHandle(Rc::new(RefCell::new(timeline)));
        yew::Renderer::<TimelineView>::with_root_and_props(target, TimelineViewProps { timeline })
            .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_timeline_view;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_timeline_view(
    _: &str,
    _: wasm_bindgen::JsValue,
    _: Option<wasm_bindgen::JsValue>,
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "activity-timeline-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
