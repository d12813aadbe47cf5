use foundation::color::Rgba;
use painter::{DrawCmd, PaintFrame};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

// Property writes sidestep the deprecated `set_fill_style(&JsValue)` API.
fn set_style(ctx: &CanvasRenderingContext2d, prop: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(ctx.as_ref(), &JsValue::from_str(prop), value);
}

fn set_fill(ctx: &CanvasRenderingContext2d, css: &str) {
    set_style(ctx, "fillStyle", &JsValue::from_str(css));
}

fn set_stroke(ctx: &CanvasRenderingContext2d, css: &str) {
    set_style(ctx, "strokeStyle", &JsValue::from_str(css));
}

fn transparent(c: Rgba) -> String {
    c.rgb.with_alpha(0.0).to_css()
}

pub fn draw(ctx: &CanvasRenderingContext2d, frame: &PaintFrame) -> Result<(), JsValue> {
    for cmd in &frame.commands {
        draw_one(ctx, cmd)?;
    }
    Ok(())
}

fn draw_one(ctx: &CanvasRenderingContext2d, cmd: &DrawCmd) -> Result<(), JsValue> {
    match *cmd {
        DrawCmd::Clear { width, height } => ctx.clear_rect(0.0, 0.0, width, height),
        DrawCmd::GridLines {
            cell,
            cols,
            rows,
            color,
        } => {
            let (w, h) = (f64::from(cols) * cell, f64::from(rows) * cell);
            set_stroke(ctx, &color.to_css());
            ctx.set_line_width(0.5);
            for c in 0..=cols {
                let x = f64::from(c) * cell;
                ctx.begin_path();
                ctx.move_to(x, 0.0);
                ctx.line_to(x, h);
                ctx.stroke();
            }
            for r in 0..=rows {
                let y = f64::from(r) * cell;
                ctx.begin_path();
                ctx.move_to(0.0, y);
                ctx.line_to(w, y);
                ctx.stroke();
            }
        }
        DrawCmd::GlowCell {
            x,
            y,
            size,
            inner,
            mid,
            border,
            ..
        } => {
            let (cx, cy) = (x + size / 2.0, y + size / 2.0);
            let g = ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, size * 0.8)?;
            g.add_color_stop(0.0, &inner.to_css())?;
            g.add_color_stop(0.6, &mid.to_css())?;
            g.add_color_stop(1.0, &transparent(inner))?;
            set_style(ctx, "fillStyle", g.as_ref());
            ctx.fill_rect(x, y, size, size);
            set_stroke(ctx, &border.to_css());
            ctx.set_line_width(1.0);
            ctx.stroke_rect(x, y, size, size);
        }
        DrawCmd::Blob { x, y, radius, color } => {
            let g = ctx.create_radial_gradient(x, y, 0.0, x, y, radius)?;
            g.add_color_stop(0.0, &color.to_css())?;
            g.add_color_stop(1.0, &transparent(color))?;
            set_style(ctx, "fillStyle", g.as_ref());
            ctx.fill_rect(x - radius, y - radius, radius * 2.0, radius * 2.0);
        }
        DrawCmd::Block { x, y, size, color } => {
            set_fill(ctx, &color.to_css());
            ctx.fill_rect(x, y, size, size);
        }
        DrawCmd::Vignette {
            width,
            height,
            inner_radius,
            outer_radius,
            color,
        } => {
            let (cx, cy) = (width / 2.0, height / 2.0);
            let g = ctx.create_radial_gradient(cx, cy, inner_radius, cx, cy, outer_radius)?;
            g.add_color_stop(0.0, &transparent(color))?;
            g.add_color_stop(1.0, &color.to_css())?;
            set_style(ctx, "fillStyle", g.as_ref());
            ctx.fill_rect(0.0, 0.0, width, height);
        }
    }
    Ok(())
}
