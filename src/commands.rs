use std::io::Write;
use std::path::Path;

use hudsnap_core::{
    AppConfigExt, GuideKind, GuideSource, Point, PointerId, PointerResponse, Shortcut, Size,
    WidgetSpec,
};

use hudsnap_overlay::OverlaySurface;
use crate::context::ReplContext;

pub fn register(
    ctx: &mut ReplContext,
    id: &str,
    size: Size,
    default_position: Point,
    label: Option<&str>,
    interactive: bool,
) {
    let mut spec = WidgetSpec::new(id, default_position, size).interactive(interactive);
    if let Some(label) = label {
        spec = spec.with_label(label);
    }
    let position = ctx.host.register_widget(spec);
    println!("{id} at ({}, {})", position.x, position.y);
}

pub fn set_size(ctx: &mut ReplContext, id: &str, size: Size) {
    if !ctx.host.set_widget_size(id, size) {
        println!("unknown widget: {id}");
    }
}

pub fn unregister(ctx: &mut ReplContext, id: &str) {
    if !ctx.host.unregister(id) {
        println!("unknown widget: {id}");
    }
}

pub fn place(ctx: &mut ReplContext, id: &str, position: Point) {
    match ctx.host.update_position(id, position) {
        Some(p) => println!("{id} at ({}, {})", p.x, p.y),
        None => println!("{id} not moved"),
    }
}

pub fn set_edit_mode(ctx: &mut ReplContext, enabled: Option<bool>) {
    match enabled {
        Some(enabled) => ctx.host.set_edit_mode(enabled),
        None => {
            ctx.host.toggle_edit_mode();
        }
    }
    println!("edit mode {}", if ctx.host.edit_mode() { "on" } else { "off" });
}

pub fn pointer_down(ctx: &mut ReplContext, pointer: u32, at: Point) {
    let response = ctx.host.pointer_down(PointerId(pointer), at);
    print_response(response);
}

pub fn pointer_move(ctx: &mut ReplContext, pointer: u32, at: Point) {
    let response = ctx.host.pointer_move(PointerId(pointer), at);
    print_response(response);
}

pub fn pointer_up(ctx: &mut ReplContext, pointer: u32, at: Point) {
    let response = ctx.host.pointer_up(PointerId(pointer), at);
    print_response(response);
}

pub fn frame(ctx: &mut ReplContext) {
    let output = ctx.frame();
    for (id, position) in &output.moved {
        println!("moved {id} to ({}, {})", position.x, position.y);
    }
    println!("{} damaged region(s)", output.damage.len());
}

pub fn resize(ctx: &mut ReplContext, width: u32, height: u32) -> Result<(), String> {
    ctx.scene
        .resize(&mut ctx.host, width, height)
        .map_err(|e| e.to_string())
}

pub fn reset(ctx: &mut ReplContext, id: &str) {
    match ctx.host.reset_widget(id) {
        Some(p) => println!("{id} reset to ({}, {})", p.x, p.y),
        None => println!("unknown widget: {id}"),
    }
}

pub fn reset_all(ctx: &mut ReplContext) {
    let count = ctx.host.reset_all();
    println!("reset {count} widget(s)");
}

pub fn shortcut(ctx: &mut ReplContext, value: &str) -> Result<(), String> {
    let shortcut: Shortcut = value.parse().map_err(|e| format!("{value}: {e}"))?;
    match ctx.host.handle_shortcut(&shortcut) {
        Some(action) => println!("{value}: {}", action.name()),
        None => println!("{value}: no action"),
    }
    Ok(())
}

pub fn show(ctx: &ReplContext) {
    let host = &ctx.host;
    let container = host.container();
    println!(
        "container {}x{}, edit mode {}, click-through {}",
        container.width,
        container.height,
        if host.edit_mode() { "on" } else { "off" },
        ctx.scene.surface().is_click_through(),
    );
    for widget in host.widgets() {
        let r = widget.rect;
        println!(
            "  {:<20} ({}, {}) {}x{}{}{}",
            widget.id.as_str(),
            r.x,
            r.y,
            r.width,
            r.height,
            if widget.interactive { " interactive" } else { "" },
            if widget.dragging { " dragging" } else { "" },
        );
    }
    for guide in host.guides() {
        let kind = match guide.kind {
            GuideKind::Vertical => "x",
            GuideKind::Horizontal => "y",
        };
        let source = match &guide.source {
            GuideSource::Container => "container".to_string(),
            GuideSource::Widget(id) => id.to_string(),
        };
        println!(
            "  guide {kind} = {} ({source}) {}",
            guide.position,
            guide.label.as_deref().unwrap_or("")
        );
    }
}

pub fn render(ctx: &mut ReplContext, path: &Path) -> Result<(), String> {
    ctx.scene.render_full(&ctx.host);
    ctx.scene
        .surface()
        .save_png(path)
        .map_err(|e| e.to_string())?;
    println!("wrote {}", path.display());
    Ok(())
}

pub fn save_config(ctx: &ReplContext) -> Result<(), String> {
    ctx.config.save().map_err(|e| e.to_string())?;
    println!("config saved");
    Ok(())
}

pub fn exit(ctx: &ReplContext) {
    tokio::task::block_in_place(|| ctx.host.sink().flush());
    write!(std::io::stdout(), "quitting...").ok();
    std::io::stdout().flush().ok();
}

fn print_response(response: PointerResponse) {
    match response {
        PointerResponse::Consumed => println!("consumed"),
        PointerResponse::PassThrough => println!("pass-through"),
    }
}

pub fn set_threshold(ctx: &mut ReplContext, threshold: f32) -> Result<(), String> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(format!("invalid threshold: {threshold}"));
    }
    ctx.config.layout.snap_threshold = threshold;
    ctx.host.set_snap_threshold(threshold);
    println!("snap threshold {threshold}");
    Ok(())
}
