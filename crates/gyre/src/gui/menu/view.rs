use super::gesture::Engine;
use super::model::Icon;
use super::targets::TargetKind;
use super::{HIGHLIGHT_RADIUS_FACTOR, ICON_INACTIVE_ALPHA, TARGET_ICON_SIZE, TAU};
use crate::gui::theme::ThemeColors;
use appdex::icon::IconName;
use cairo::{Context, Operator};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;

/// Bitmaps for the four edit-mode action targets, resolved from the standard
/// freedesktop action icons. Targets with no resolvable icon fall back to a
/// text label, so layout and hit-testing never depend on them.
pub struct TargetAssets {
    pixbufs: [Option<Pixbuf>; 4],
}

impl TargetAssets {
    const ICON_NAMES: [&'static str; 4] = [
        "list-add",
        "list-remove",
        "dialog-information",
        "object-select",
    ];

    const LABELS: [&'static str; 4] = ["+", "-", "i", "ok"];

    pub fn load() -> Self {
        let pixbufs = Self::ICON_NAMES.map(|name| {
            appdex::icon::find_icon_path(&IconName::new(name), TARGET_ICON_SIZE as u16).and_then(
                |path| {
                    Pixbuf::from_file_at_scale(&path, TARGET_ICON_SIZE, TARGET_ICON_SIZE, true).ok()
                },
            )
        });
        Self { pixbufs }
    }

    pub fn sizes(&self) -> [(f64, f64); 4] {
        self.pixbufs.each_ref().map(|pixbuf| match pixbuf {
            Some(pb) => (pb.width() as f64, pb.height() as f64),
            None => (TARGET_ICON_SIZE as f64, TARGET_ICON_SIZE as f64),
        })
    }

    fn pixbuf(&self, kind: TargetKind) -> Option<&Pixbuf> {
        self.pixbufs[kind as usize].as_ref()
    }

    fn label(kind: TargetKind) -> &'static str {
        Self::LABELS[kind as usize]
    }
}

/// Paints one frame from the engine's current state and records the dedup
/// point. The caller only invokes this when the engine asked for a redraw.
pub fn draw(
    cr: &Context,
    engine: &mut Engine,
    colors: &ThemeColors,
    assets: &TargetAssets,
) -> Result<(), cairo::Error> {
    clear(cr, engine.is_edit_mode(), colors)?;

    if engine.menu_visible() {
        if engine.is_edit_mode() {
            draw_targets(cr, engine, colors, assets)?;
        }
        if !engine.is_edit_mode()
            && let Some(icon) = engine.menu.selected_icon()
        {
            let (r, g, b, a) = colors.highlight.into_components();
            cr.set_source_rgba(r, g, b, a);
            cr.arc(icon.x, icon.y, icon.size * HIGHLIGHT_RADIUS_FACTOR, 0.0, TAU);
            cr.fill()?;
        }
        for icon in &engine.menu.icons {
            draw_icon(cr, icon, colors)?;
        }
    }

    engine.mark_drawn();
    Ok(())
}

fn clear(cr: &Context, edit_mode: bool, colors: &ThemeColors) -> Result<(), cairo::Error> {
    cr.save()?;
    cr.set_operator(Operator::Source);
    if edit_mode {
        let (r, g, b, a) = colors.edit_backdrop.into_components();
        cr.set_source_rgba(r, g, b, a);
    } else {
        cr.set_source_rgba(0.0, 0.0, 0.0, 0.0);
    }
    cr.paint()?;
    cr.restore()
}

fn draw_targets(
    cr: &Context,
    engine: &Engine,
    colors: &ThemeColors,
    assets: &TargetAssets,
) -> Result<(), cairo::Error> {
    let grabbed = engine.has_grab();
    for kind in TargetKind::ALL {
        // add and done act on the whole menu, remove and info on the grab
        let active = match kind {
            TargetKind::Add | TargetKind::Done => !grabbed,
            TargetKind::Remove | TargetKind::Info => grabbed,
        };
        let rect = engine.targets().rect(kind);

        let hot = active && engine.touch().is_some_and(|p| rect.contains(p));
        if hot {
            let (r, g, b, a) = colors.highlight.into_components();
            cr.set_source_rgba(r, g, b, a);
            let center = rect.center();
            cr.arc(
                center.x,
                center.y,
                rect.width.max(rect.height) * 0.75,
                0.0,
                TAU,
            );
            cr.fill()?;
        }

        let alpha = if active { 1.0 } else { ICON_INACTIVE_ALPHA };
        match assets.pixbuf(kind) {
            Some(pixbuf) => {
                cr.save()?;
                cr.translate(rect.x.round(), rect.y.round());
                cr.scale(
                    rect.width / pixbuf.width() as f64,
                    rect.height / pixbuf.height() as f64,
                );
                cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
                cr.paint_with_alpha(alpha)?;
                cr.restore()?;
            }
            None => {
                let center = rect.center();
                draw_label(
                    cr,
                    TargetAssets::label(kind),
                    center.x,
                    center.y,
                    rect.height * 0.5,
                    colors,
                    alpha,
                )?;
            }
        }
    }
    Ok(())
}

fn draw_icon(cr: &Context, icon: &Icon, colors: &ThemeColors) -> Result<(), cairo::Error> {
    match &icon.pixbuf {
        Some(pixbuf) => {
            let largest = pixbuf.width().max(pixbuf.height()) as f64;
            let scale = icon.size / largest;
            let (w, h) = (
                pixbuf.width() as f64 * scale,
                pixbuf.height() as f64 * scale,
            );
            cr.save()?;
            // geometry stays fractional; rounding happens only here
            cr.translate((icon.x - w * 0.5).round(), (icon.y - h * 0.5).round());
            cr.scale(scale, scale);
            cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
            cr.paint()?;
            cr.restore()
        }
        None => draw_label(
            cr,
            icon.app.name.as_str(),
            icon.x,
            icon.y,
            (icon.size * 0.25).max(10.0),
            colors,
            1.0,
        ),
    }
}

fn draw_label(
    cr: &Context,
    text: &str,
    x: f64,
    y: f64,
    font_size: f64,
    colors: &ThemeColors,
    alpha: f64,
) -> Result<(), cairo::Error> {
    let (r, g, b, a) = colors.label.into_components();
    cr.set_source_rgba(r, g, b, a * alpha);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(font_size);
    if let Ok(ext) = cr.text_extents(text) {
        cr.move_to(x - ext.width() / 2.0, y + ext.height() / 2.0);
        cr.show_text(text)?;
    }
    Ok(())
}
