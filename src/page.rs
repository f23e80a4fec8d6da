//! Motion wiring of the restaurant page, one preset per section.
//!
//! Each preset takes the section's [`SectionScope`] and a typed layout describing where the
//! presentation layer put its elements. Elements that were declared but could not be measured
//! (`bounds: None`) are not mounted; anything that needs them is skipped with a warning and
//! counted in [`PresetStats::skipped`], so a partially rendered section still animates what it
//! can.

use crate::animation::ease::Ease;
use crate::animation::property::Property;
use crate::animation::timeline::{FromTo, Position, Repeat, Timeline};
use crate::animation::tween::Motion;
use crate::context::{MotionContext, SectionScope};
use crate::foundation::core::{ElementId, Rect};
use crate::foundation::error::{MotionError, MotionResult};
use crate::interaction::{HoverSpec, HoverTween};
use crate::trigger::registry::{ToggleTween, TriggerSpec};
use crate::trigger::threshold::Threshold;

/// An element handed to a preset, with its document-space bounds once measured.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placed {
    /// Element handle.
    pub id: ElementId,
    /// Bounds in document coordinates; `None` when the element is not rendered.
    #[serde(default)]
    pub bounds: Option<Rect>,
}

impl Placed {
    /// A measured element.
    pub fn new(id: ElementId, bounds: Rect) -> Self {
        Self {
            id,
            bounds: Some(bounds),
        }
    }

    /// An element that exists but has no layout.
    pub fn unmeasured(id: ElementId) -> Self {
        Self { id, bounds: None }
    }
}

/// Registrations a preset made.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PresetStats {
    /// Timelines handed to the runtime.
    pub timelines: usize,
    /// Triggers registered.
    pub triggers: usize,
    /// Hover bindings.
    pub hovers: usize,
    /// Registrations skipped because an element was not mounted.
    pub skipped: usize,
}

/// Sticky header: hidden until the page has scrolled past the hero's first 100px.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HeaderLayout {
    /// Header bar.
    pub bar: Placed,
}

/// Hero section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroLayout {
    /// Section root; positions the parallax and content fade.
    pub root: Placed,
    /// Full-bleed background image.
    pub background: Option<Placed>,
    /// Wrapper of the text block.
    pub content: Option<Placed>,
    /// Floating crown ornament.
    pub crown: Option<Placed>,
    /// Line above the title.
    pub subtitle: Option<Placed>,
    /// Title.
    pub title: Option<Placed>,
    /// Line below the title.
    pub tagline: Option<Placed>,
    /// Call-to-action buttons, in document order.
    #[serde(default)]
    pub buttons: Vec<Placed>,
    /// Decorative flourishes.
    #[serde(default)]
    pub decorative: Vec<Placed>,
    /// "Scroll down" indicator.
    pub scroll_indicator: Option<Placed>,
}

/// A location card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LocationCard {
    /// Card body; hover trigger.
    pub card: Placed,
    /// Icon badge.
    pub icon: Option<Placed>,
}

/// Location section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LocationLayout {
    /// Section root.
    pub root: Placed,
    /// Section heading block.
    pub header: Option<Placed>,
    /// Cards, in document order.
    #[serde(default)]
    pub cards: Vec<LocationCard>,
}

/// An offering card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OfferingCard {
    /// Card body; hover trigger.
    pub card: Placed,
    /// Card image.
    pub image: Option<Placed>,
    /// Text block.
    pub content: Option<Placed>,
}

/// Offerings section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OfferingsLayout {
    /// Section root.
    pub root: Placed,
    /// Cards, in document order. Even cards slide in from the left, odd from the right.
    #[serde(default)]
    pub cards: Vec<OfferingCard>,
}

/// A menu card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MenuCard {
    /// Card body; hover trigger.
    pub card: Placed,
    /// Dish image.
    pub image: Option<Placed>,
    /// Price or "signature" badge.
    pub badge: Option<Placed>,
}

/// Menu section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MenuLayout {
    /// Section root.
    pub root: Placed,
    /// Section heading block.
    pub header: Option<Placed>,
    /// Cards, in document order.
    #[serde(default)]
    pub cards: Vec<MenuCard>,
    /// "Full menu" call to action.
    pub cta: Option<Placed>,
}

/// Chef section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChefLayout {
    /// Section root; positions the section timeline.
    pub root: Placed,
    /// Portrait wrapper.
    pub image_wrapper: Option<Placed>,
    /// Portrait frame; hover trigger for the zoom.
    pub image_frame: Option<Placed>,
    /// Portrait image.
    pub image: Option<Placed>,
    /// Decorative shape behind the portrait.
    pub decoration: Option<Placed>,
    /// Line above the title.
    pub subtitle: Option<Placed>,
    /// Title.
    pub title: Option<Placed>,
    /// Quote block.
    pub quote: Option<Placed>,
    /// Info rows, in document order.
    #[serde(default)]
    pub info: Vec<Placed>,
    /// Call-to-action button.
    pub button: Option<Placed>,
}

/// A gallery tile.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GalleryItem {
    /// Tile; hover trigger.
    pub item: Placed,
    /// Tile image.
    pub image: Option<Placed>,
    /// Overlay that slides up on hover.
    pub overlay: Option<Placed>,
    /// Caption inside the overlay.
    pub content: Option<Placed>,
}

/// Gallery section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GalleryLayout {
    /// Section root.
    pub root: Placed,
    /// Section heading block.
    pub header: Option<Placed>,
    /// Tiles, in document order.
    #[serde(default)]
    pub items: Vec<GalleryItem>,
}

/// Background that drifts against its container while the container crosses the viewport.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Parallax {
    /// Moving background.
    pub background: Placed,
    /// Container whose bounds position the effect.
    pub container: Placed,
}

/// Page-wide reveals that are not owned by a particular section.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalLayout {
    /// Section headings that fade up on their own.
    #[serde(default)]
    pub section_headers: Vec<Placed>,
    /// Card rows revealed together, staggered, when their first card enters.
    #[serde(default)]
    pub card_groups: Vec<Vec<Placed>>,
    /// Parallax backgrounds.
    #[serde(default)]
    pub parallax: Vec<Parallax>,
}

/// Every section of the page. Absent sections are not mounted.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RestaurantPage {
    /// Sticky header.
    pub header: Option<HeaderLayout>,
    /// Hero.
    pub hero: Option<HeroLayout>,
    /// Location.
    pub location: Option<LocationLayout>,
    /// Offerings.
    pub offerings: Option<OfferingsLayout>,
    /// Menu.
    pub menu: Option<MenuLayout>,
    /// Chef.
    pub chef: Option<ChefLayout>,
    /// Gallery.
    pub gallery: Option<GalleryLayout>,
    /// Page-wide reveals.
    pub global: Option<GlobalLayout>,
}

/// A mounted section and what its preset registered.
#[derive(Debug)]
pub struct MountedSection {
    /// Scope to tear down on unmount.
    pub scope: SectionScope,
    /// Registrations made.
    pub stats: PresetStats,
}

/// Mount every section present in `page`, in document order, with page-wide reveals last.
pub fn mount_page(
    ctx: &MotionContext,
    page: &RestaurantPage,
) -> MotionResult<Vec<MountedSection>> {
    let mut mounted = Vec::new();
    if let Some(layout) = &page.header {
        mount_section(ctx, &mut mounted, "header", |s| header(s, layout))?;
    }
    if let Some(layout) = &page.hero {
        mount_section(ctx, &mut mounted, "hero", |s| hero(s, layout))?;
    }
    if let Some(layout) = &page.location {
        mount_section(ctx, &mut mounted, "location", |s| location(s, layout))?;
    }
    if let Some(layout) = &page.offerings {
        mount_section(ctx, &mut mounted, "offerings", |s| offerings(s, layout))?;
    }
    if let Some(layout) = &page.menu {
        mount_section(ctx, &mut mounted, "menu", |s| menu(s, layout))?;
    }
    if let Some(layout) = &page.chef {
        mount_section(ctx, &mut mounted, "chef", |s| chef(s, layout))?;
    }
    if let Some(layout) = &page.gallery {
        mount_section(ctx, &mut mounted, "gallery", |s| gallery(s, layout))?;
    }
    if let Some(layout) = &page.global {
        mount_section(ctx, &mut mounted, "global", |s| global_reveals(s, layout))?;
    }
    Ok(mounted)
}

fn mount_section(
    ctx: &MotionContext,
    mounted: &mut Vec<MountedSection>,
    name: &str,
    wire: impl FnOnce(&SectionScope) -> MotionResult<PresetStats>,
) -> MotionResult<()> {
    let scope = ctx.section(name);
    let stats = match wire(&scope) {
        Ok(stats) => stats,
        Err(e) => {
            scope.teardown();
            return Err(e);
        }
    };
    tracing::debug!(section = name, ?stats, "section mounted");
    mounted.push(MountedSection { scope, stats });
    Ok(())
}

/// Show the header once the page scrolls 100px, hide it again above that.
pub fn header(scope: &SectionScope, layout: &HeaderLayout) -> MotionResult<PresetStats> {
    let mut w = Wiring::new(scope);
    w.mount([&layout.bar])?;
    let spec = TriggerSpec::toggle(
        layout.bar.id,
        th("100px top")?,
        vec![ToggleTween {
            element: layout.bar.id,
            property: Property::YPercent,
            on: 0.0,
            off: -110.0,
            motion: Motion::new(0.3, Ease::InOutCubic),
        }],
    );
    let result = scope.trigger(spec);
    if w.settle(result, "header toggle")?.is_some() {
        w.stats.triggers += 1;
    }
    Ok(w.stats)
}

/// Intro timeline played at mount, floating crown, background parallax and content fade-out.
pub fn hero(scope: &SectionScope, layout: &HeroLayout) -> MotionResult<PresetStats> {
    let mut w = Wiring::new(scope);
    w.mount(
        [&layout.root]
            .into_iter()
            .chain(&layout.background)
            .chain(&layout.content)
            .chain(&layout.crown)
            .chain(&layout.subtitle)
            .chain(&layout.title)
            .chain(&layout.tagline)
            .chain(&layout.buttons)
            .chain(&layout.decorative)
            .chain(&layout.scroll_indicator),
    )?;

    let intro = Timeline::builder("hero-intro")
        .default_ease(Ease::OutQuart)
        .from_to(
            group(&layout.background)
                .prop(Property::Scale, 1.2, 1.0)
                .prop(Property::Opacity, 0.0, 1.0)
                .duration(1.5),
            Position::Sequential,
        )
        .from_to(
            group(&layout.subtitle)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::Y, 40.0, 0.0)
                .prop(Property::RotationX, -45.0, 0.0)
                .duration(0.8),
            Position::Relative(-0.8),
        )
        .from_to(
            group(&layout.title)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::Y, 60.0, 0.0)
                .prop(Property::ClipReveal, 0.0, 1.0)
                .duration(1.0),
            Position::Relative(-0.5),
        )
        .from_to(
            group(&layout.tagline)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::Y, 30.0, 0.0)
                .duration(0.8),
            Position::Relative(-0.6),
        )
        .from_to(
            group(&layout.buttons)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::Y, 30.0, 0.0)
                .prop(Property::Scale, 0.9, 1.0)
                .duration(0.6)
                .stagger(0.15),
            Position::Relative(-0.4),
        )
        .from_to(
            group(&layout.decorative)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::Scale, 0.5, 1.0)
                .prop(Property::Rotation, -180.0, 0.0)
                .duration(1.2)
                .ease(Ease::OutElastic {
                    amplitude: 1.0,
                    period: 0.5,
                }),
            Position::Relative(-0.3),
        )
        .from_to(
            group(&layout.scroll_indicator)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::Y, -20.0, 0.0)
                .duration(0.8),
            Position::Relative(-0.5),
        )
        .build();
    w.play(intro)?;

    if let Some(crown) = &layout.crown {
        let float = Timeline::builder("hero-crown")
            .from_to(
                FromTo::new(crown.id)
                    .prop(Property::Y, 0.0, -20.0)
                    .duration(2.0)
                    .ease(Ease::InOutSine),
                Position::Sequential,
            )
            .repeat(Repeat::forever(true))
            .build();
        w.play(float)?;
    }

    if let Some(background) = &layout.background {
        let parallax = Timeline::builder("hero-parallax")
            .from_to(
                FromTo::new(background.id)
                    .prop(Property::YPercent, 0.0, 30.0)
                    .ease(Ease::Linear),
                Position::Sequential,
            )
            .build();
        w.scrub(layout.root.id, "top top", "bottom top", parallax)?;
    }

    if let Some(content) = &layout.content {
        let fade = Timeline::builder("hero-content-fade")
            .from_to(
                FromTo::new(content.id)
                    .prop(Property::Opacity, 1.0, 0.0)
                    .prop(Property::Y, 0.0, -50.0)
                    .ease(Ease::Linear),
                Position::Sequential,
            )
            .build();
        w.scrub(layout.root.id, "center center", "bottom top", fade)?;
    }
    Ok(w.stats)
}

/// Heading reveal, per-card reveals and card hovers.
pub fn location(scope: &SectionScope, layout: &LocationLayout) -> MotionResult<PresetStats> {
    let mut w = Wiring::new(scope);
    w.mount(
        [&layout.root]
            .into_iter()
            .chain(&layout.header)
            .chain(layout.cards.iter().flat_map(|c| [Some(&c.card), c.icon.as_ref()]).flatten()),
    )?;

    if let Some(header) = &layout.header {
        w.reveal(layout.root.id, "top 80%", heading_reveal("location-header", header.id))?;
    }
    for (i, card) in layout.cards.iter().enumerate() {
        let tl = Timeline::builder(format!("location-card-{i}"))
            .default_ease(Ease::OutQuart)
            .delay(i as f64 * 0.2)
            .from_to(
                FromTo::new(card.card.id)
                    .prop(Property::Opacity, 0.0, 1.0)
                    .prop(Property::Y, 80.0, 0.0)
                    .prop(Property::Scale, 0.9, 1.0)
                    .duration(0.8),
                Position::Sequential,
            )
            .build();
        w.reveal(card.card.id, "top 90%", tl)?;

        let mut spec = HoverSpec::new().tween(
            HoverTween::new(card.card.id, Property::Y, -10.0, Motion::new(0.4, Ease::OutCubic))
                .rest(0.0),
        );
        if let Some(icon) = &card.icon {
            spec = spec.tween(
                HoverTween::new(
                    icon.id,
                    Property::Scale,
                    1.1,
                    Motion::new(0.3, Ease::OutBack { overshoot: 1.7 }),
                )
                .leave(Motion::new(0.3, Ease::OutCubic))
                .rest(1.0),
            );
        }
        w.hover(card.card.id, spec)?;
    }
    Ok(w.stats)
}

/// Alternating slide-in reveals, image zoom and content lift on hover.
pub fn offerings(scope: &SectionScope, layout: &OfferingsLayout) -> MotionResult<PresetStats> {
    let mut w = Wiring::new(scope);
    w.mount(
        [&layout.root].into_iter().chain(
            layout
                .cards
                .iter()
                .flat_map(|c| [Some(&c.card), c.image.as_ref(), c.content.as_ref()])
                .flatten(),
        ),
    )?;

    for (i, card) in layout.cards.iter().enumerate() {
        let side = if i % 2 == 0 { -1.0 } else { 1.0 };
        let tl = Timeline::builder(format!("offering-card-{i}"))
            .from_to(
                FromTo::new(card.card.id)
                    .prop(Property::Opacity, 0.0, 1.0)
                    .prop(Property::X, side * 100.0, 0.0)
                    .prop(Property::RotationY, side * 15.0, 0.0)
                    .duration(1.0)
                    .ease(Ease::OutQuart),
                Position::Sequential,
            )
            .build();
        w.reveal(card.card.id, "top 85%", tl)?;

        let mut spec = HoverSpec::new();
        if let Some(image) = &card.image {
            spec = spec.tween(
                HoverTween::new(image.id, Property::Scale, 1.1, Motion::new(0.6, Ease::OutCubic))
                    .rest(1.0),
            );
        }
        if let Some(content) = &card.content {
            spec = spec.tween(
                HoverTween::new(content.id, Property::Y, -10.0, Motion::new(0.3, Ease::OutCubic))
                    .rest(0.0),
            );
        }
        if !spec.tweens.is_empty() {
            w.hover(card.card.id, spec)?;
        }
    }
    Ok(w.stats)
}

/// Heading reveal, tilted card reveals, card hovers and the call to action.
pub fn menu(scope: &SectionScope, layout: &MenuLayout) -> MotionResult<PresetStats> {
    let mut w = Wiring::new(scope);
    w.mount(
        [&layout.root]
            .into_iter()
            .chain(&layout.header)
            .chain(&layout.cta)
            .chain(
                layout
                    .cards
                    .iter()
                    .flat_map(|c| [Some(&c.card), c.image.as_ref(), c.badge.as_ref()])
                    .flatten(),
            ),
    )?;

    if let Some(header) = &layout.header {
        w.reveal(layout.root.id, "top 80%", heading_reveal("menu-header", header.id))?;
    }
    for (i, card) in layout.cards.iter().enumerate() {
        let tl = Timeline::builder(format!("menu-card-{i}"))
            .default_ease(Ease::OutQuart)
            .delay(i as f64 * 0.2)
            .from_to(
                FromTo::new(card.card.id)
                    .prop(Property::Opacity, 0.0, 1.0)
                    .prop(Property::Y, 100.0, 0.0)
                    .prop(Property::Scale, 0.8, 1.0)
                    .prop(Property::RotationX, 15.0, 0.0)
                    .duration(0.8),
                Position::Sequential,
            )
            .build();
        w.reveal(card.card.id, "top 90%", tl)?;

        let mut spec = HoverSpec::new().tween(
            HoverTween::new(card.card.id, Property::Y, -15.0, Motion::new(0.4, Ease::OutCubic))
                .rest(0.0),
        );
        if let Some(image) = &card.image {
            spec = spec.tween(
                HoverTween::new(image.id, Property::Scale, 1.15, Motion::new(0.6, Ease::OutCubic))
                    .rest(1.0),
            );
        }
        if let Some(badge) = &card.badge {
            spec = spec.tween(
                HoverTween::new(
                    badge.id,
                    Property::Scale,
                    1.1,
                    Motion::new(0.3, Ease::OutBack { overshoot: 1.7 }),
                )
                .leave(Motion::new(0.3, Ease::OutCubic))
                .rest(1.0),
            );
        }
        w.hover(card.card.id, spec)?;
    }

    if let Some(cta) = &layout.cta {
        let tl = Timeline::builder("menu-cta")
            .from_to(
                FromTo::new(cta.id)
                    .prop(Property::Opacity, 0.0, 1.0)
                    .prop(Property::Y, 30.0, 0.0)
                    .duration(0.8)
                    .ease(Ease::OutQuart),
                Position::Sequential,
            )
            .build();
        w.reveal(cta.id, "top 90%", tl)?;
    }
    Ok(w.stats)
}

/// One section timeline with overlapping steps, plus the portrait hover zoom.
pub fn chef(scope: &SectionScope, layout: &ChefLayout) -> MotionResult<PresetStats> {
    let mut w = Wiring::new(scope);
    w.mount(
        [&layout.root]
            .into_iter()
            .chain(&layout.image_wrapper)
            .chain(&layout.image_frame)
            .chain(&layout.image)
            .chain(&layout.decoration)
            .chain(&layout.subtitle)
            .chain(&layout.title)
            .chain(&layout.quote)
            .chain(&layout.info)
            .chain(&layout.button),
    )?;

    let info_and_button = layout.info.iter().chain(&layout.button).map(|p| p.id);
    let tl = Timeline::builder("chef")
        .default_ease(Ease::OutQuart)
        .from_to(
            group(&layout.image_wrapper)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::X, -100.0, 0.0)
                .prop(Property::Scale, 0.9, 1.0)
                .duration(1.0),
            Position::Sequential,
        )
        .from_to(
            group(&layout.decoration)
                .prop(Property::Opacity, 0.0, 0.3)
                .prop(Property::Scale, 0.8, 1.0)
                .duration(0.8)
                .ease(Ease::OutCubic),
            Position::Relative(-0.6),
        )
        .from_to(
            group(&layout.subtitle)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::Y, 30.0, 0.0)
                .duration(0.6),
            Position::Relative(-0.8),
        )
        .from_to(
            group(&layout.title)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::Y, 40.0, 0.0)
                .prop(Property::ClipReveal, 0.0, 1.0)
                .duration(0.8),
            Position::Relative(-0.4),
        )
        .from_to(
            group(&layout.quote)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::X, 50.0, 0.0)
                .duration(0.8),
            Position::Relative(-0.5),
        )
        .from_to(
            FromTo::targets(info_and_button)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::Y, 30.0, 0.0)
                .duration(0.6)
                .stagger(0.15),
            Position::Relative(-0.4),
        )
        .build();
    w.reveal(layout.root.id, "top 75%", tl)?;

    if let (Some(frame), Some(image)) = (&layout.image_frame, &layout.image) {
        let spec = HoverSpec::new().tween(HoverTween::new(
            image.id,
            Property::Scale,
            1.08,
            Motion::new(0.6, Ease::OutCubic),
        ));
        w.hover(frame.id, spec)?;
    }
    Ok(w.stats)
}

/// Heading reveal, staggered tile reveals, and the overlay hover of every tile.
pub fn gallery(scope: &SectionScope, layout: &GalleryLayout) -> MotionResult<PresetStats> {
    let mut w = Wiring::new(scope);
    w.mount(
        [&layout.root].into_iter().chain(&layout.header).chain(
            layout
                .items
                .iter()
                .flat_map(|g| {
                    [
                        Some(&g.item),
                        g.image.as_ref(),
                        g.overlay.as_ref(),
                        g.content.as_ref(),
                    ]
                })
                .flatten(),
        ),
    )?;

    if let Some(header) = &layout.header {
        w.reveal(layout.root.id, "top 80%", heading_reveal("gallery-header", header.id))?;
    }
    let enter = Motion::new(0.4, Ease::OutCubic);
    for (i, item) in layout.items.iter().enumerate() {
        let tl = Timeline::builder(format!("gallery-item-{i}"))
            .default_ease(Ease::OutQuart)
            .delay(i as f64 * 0.15)
            .from_to(
                FromTo::new(item.item.id)
                    .prop(Property::Opacity, 0.0, 1.0)
                    .prop(Property::Scale, 0.8, 1.0)
                    .prop(Property::Y, 50.0, 0.0)
                    .duration(0.8),
                Position::Sequential,
            )
            .build();
        w.reveal(item.item.id, "top 90%", tl)?;

        let mut spec = HoverSpec::new();
        if let Some(image) = &item.image {
            spec = spec.tween(HoverTween::new(
                image.id,
                Property::Scale,
                1.1,
                Motion::new(0.6, Ease::OutCubic),
            ));
        }
        if let Some(overlay) = &item.overlay {
            spec = spec.tween(
                HoverTween::new(overlay.id, Property::YPercent, 0.0, enter)
                    .initial(101.0)
                    .leave(Motion::new(0.4, Ease::InCubic)),
            );
        }
        if let Some(content) = &item.content {
            let leave = Motion::new(0.3, Ease::InCubic);
            spec = spec
                .tween(
                    HoverTween::new(content.id, Property::Y, 0.0, enter.delayed(0.1))
                        .initial(20.0)
                        .leave(leave),
                )
                .tween(
                    HoverTween::new(content.id, Property::Opacity, 1.0, enter.delayed(0.1))
                        .initial(0.0)
                        .leave(leave),
                );
        }
        if !spec.tweens.is_empty() {
            w.hover(item.item.id, spec)?;
        }
    }
    Ok(w.stats)
}

/// Page-wide heading reveals, staggered card rows and parallax backgrounds.
pub fn global_reveals(scope: &SectionScope, layout: &GlobalLayout) -> MotionResult<PresetStats> {
    let mut w = Wiring::new(scope);
    w.mount(
        layout
            .section_headers
            .iter()
            .chain(layout.card_groups.iter().flatten())
            .chain(layout.parallax.iter().flat_map(|p| [&p.background, &p.container])),
    )?;

    for (i, header) in layout.section_headers.iter().enumerate() {
        let tl = heading_reveal(&format!("section-header-{i}"), header.id);
        w.reveal(header.id, "top 85%", tl)?;
    }

    for (i, cards) in layout.card_groups.iter().enumerate() {
        let Some(first) = cards.first() else {
            continue;
        };
        let tl = Timeline::builder(format!("cards-{i}"))
            .from_to(
                FromTo::targets(cards.iter().map(|c| c.id))
                    .prop(Property::Opacity, 0.0, 1.0)
                    .prop(Property::Y, 80.0, 0.0)
                    .prop(Property::Scale, 0.95, 1.0)
                    .duration(0.8)
                    .stagger(0.15)
                    .ease(Ease::OutQuart),
                Position::Sequential,
            )
            .build();
        w.reveal(first.id, "top 85%", tl)?;
    }

    for (i, p) in layout.parallax.iter().enumerate() {
        let tl = Timeline::builder(format!("parallax-{i}"))
            .from_to(
                FromTo::new(p.background.id)
                    .prop(Property::YPercent, 0.0, -20.0)
                    .ease(Ease::Linear),
                Position::Sequential,
            )
            .build();
        w.scrub(p.container.id, "top bottom", "bottom top", tl)?;
    }
    Ok(w.stats)
}

fn heading_reveal(label: &str, element: ElementId) -> Timeline {
    Timeline::builder(label)
        .from_to(
            FromTo::new(element)
                .prop(Property::Opacity, 0.0, 1.0)
                .prop(Property::Y, 60.0, 0.0)
                .duration(1.0)
                .ease(Ease::OutQuart),
            Position::Sequential,
        )
        .build()
}

fn group<'a>(placed: impl IntoIterator<Item = &'a Placed>) -> FromTo {
    FromTo::targets(placed.into_iter().map(|p| p.id))
}

fn th(s: &str) -> MotionResult<Threshold> {
    s.parse()
}

/// Registration bookkeeping shared by the presets.
struct Wiring<'a> {
    scope: &'a SectionScope,
    stats: PresetStats,
}

impl<'a> Wiring<'a> {
    fn new(scope: &'a SectionScope) -> Self {
        Self {
            scope,
            stats: PresetStats::default(),
        }
    }

    fn mount<'p>(&mut self, placed: impl IntoIterator<Item = &'p Placed>) -> MotionResult<()> {
        for p in placed {
            match p.bounds {
                Some(bounds) => self.scope.element(p.id, bounds)?,
                None => tracing::debug!(
                    section = self.scope.name(),
                    element = %p.id,
                    "element has no layout; not mounted"
                ),
            }
        }
        Ok(())
    }

    /// Turn a missing target into a skip.
    fn settle<T>(&mut self, result: MotionResult<T>, what: &str) -> MotionResult<Option<T>> {
        match result {
            Ok(v) => Ok(Some(v)),
            Err(MotionError::MissingTarget { element, context }) => {
                tracing::warn!(
                    section = self.scope.name(),
                    %element,
                    %context,
                    what,
                    "target not mounted; skipped"
                );
                self.stats.skipped += 1;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn play(&mut self, timeline: Timeline) -> MotionResult<()> {
        let label = timeline.label().to_owned();
        let id = self.scope.timeline(timeline)?;
        self.stats.timelines += 1;
        if !self.scope.play(id)? {
            tracing::warn!(section = self.scope.name(), %label, "timeline did not start");
        }
        Ok(())
    }

    fn reveal(&mut self, target: ElementId, start: &str, timeline: Timeline) -> MotionResult<()> {
        let label = timeline.label().to_owned();
        let result = self.scope.reveal(target, th(start)?, timeline);
        if self.settle(result, &label)?.is_some() {
            self.stats.timelines += 1;
            self.stats.triggers += 1;
        }
        Ok(())
    }

    fn scrub(
        &mut self,
        target: ElementId,
        start: &str,
        end: &str,
        timeline: Timeline,
    ) -> MotionResult<()> {
        let label = timeline.label().to_owned();
        let result = self.scope.scrub(target, th(start)?, Some(th(end)?), timeline);
        if self.settle(result, &label)?.is_some() {
            self.stats.timelines += 1;
            self.stats.triggers += 1;
        }
        Ok(())
    }

    fn hover(&mut self, trigger: ElementId, spec: HoverSpec) -> MotionResult<()> {
        let result = self.scope.hover(trigger, spec);
        if self.settle(result, "hover")?.is_some() {
            self.stats.hovers += 1;
        }
        Ok(())
    }
}

impl RestaurantPage {
    /// A fully measured single-column page, 1280px wide and 6200px tall, for demos and tests.
    ///
    /// Section extents: header bar 0..80 (fixed), hero 0..800, location 800..1700,
    /// offerings 1700..2900, menu 2900..4100, chef 4100..4900, gallery 4900..5900 and a
    /// footer with a card row up to 6200.
    pub fn sample() -> Self {
        let mut ids = Ids(1);
        let row = |ids: &mut Ids, n: usize, y0: f64, y1: f64| -> Vec<Placed> {
            let w = 1280.0 / n as f64;
            (0..n)
                .map(|i| ids.place(i as f64 * w + 20.0, y0, (i + 1) as f64 * w - 20.0, y1))
                .collect()
        };

        let header = HeaderLayout {
            bar: ids.place(0.0, 0.0, 1280.0, 80.0),
        };

        let hero = HeroLayout {
            root: ids.place(0.0, 0.0, 1280.0, 800.0),
            background: Some(ids.place(0.0, 0.0, 1280.0, 800.0)),
            content: Some(ids.place(240.0, 200.0, 1040.0, 600.0)),
            crown: Some(ids.place(600.0, 150.0, 680.0, 190.0)),
            subtitle: Some(ids.place(240.0, 220.0, 1040.0, 250.0)),
            title: Some(ids.place(240.0, 260.0, 1040.0, 380.0)),
            tagline: Some(ids.place(240.0, 400.0, 1040.0, 430.0)),
            buttons: vec![
                ids.place(440.0, 460.0, 620.0, 510.0),
                ids.place(660.0, 460.0, 840.0, 510.0),
            ],
            decorative: vec![
                ids.place(160.0, 300.0, 220.0, 360.0),
                ids.place(1060.0, 300.0, 1120.0, 360.0),
            ],
            scroll_indicator: Some(ids.place(620.0, 720.0, 660.0, 760.0)),
        };

        let location = LocationLayout {
            root: ids.place(0.0, 800.0, 1280.0, 1700.0),
            header: Some(ids.place(240.0, 880.0, 1040.0, 1000.0)),
            cards: row(&mut ids, 3, 1050.0, 1450.0)
                .into_iter()
                .map(|card| {
                    let r = card.bounds.unwrap_or(Rect::ZERO);
                    LocationCard {
                        card,
                        icon: Some(ids.place(r.x0 + 20.0, r.y0 + 20.0, r.x0 + 80.0, r.y0 + 80.0)),
                    }
                })
                .collect(),
        };

        let offerings_root = ids.place(0.0, 1700.0, 1280.0, 2900.0);
        let offerings_header = ids.place(240.0, 1780.0, 1040.0, 1900.0);
        let mut offering_cards = row(&mut ids, 2, 1950.0, 2350.0);
        offering_cards.extend(row(&mut ids, 2, 2400.0, 2800.0));
        let offerings = OfferingsLayout {
            root: offerings_root,
            cards: offering_cards
                .into_iter()
                .map(|card| {
                    let r = card.bounds.unwrap_or(Rect::ZERO);
                    OfferingCard {
                        card,
                        image: Some(ids.place(r.x0, r.y0, r.x1, r.y0 + 240.0)),
                        content: Some(ids.place(r.x0, r.y0 + 260.0, r.x1, r.y1)),
                    }
                })
                .collect(),
        };

        let menu = MenuLayout {
            root: ids.place(0.0, 2900.0, 1280.0, 4100.0),
            header: Some(ids.place(240.0, 2980.0, 1040.0, 3100.0)),
            cards: row(&mut ids, 3, 3150.0, 3650.0)
                .into_iter()
                .map(|card| {
                    let r = card.bounds.unwrap_or(Rect::ZERO);
                    MenuCard {
                        card,
                        image: Some(ids.place(r.x0, r.y0, r.x1, r.y0 + 280.0)),
                        badge: Some(ids.place(
                            r.x1 - 90.0,
                            r.y0 + 10.0,
                            r.x1 - 10.0,
                            r.y0 + 50.0,
                        )),
                    }
                })
                .collect(),
            cta: Some(ids.place(540.0, 3750.0, 740.0, 3800.0)),
        };

        let chef = ChefLayout {
            root: ids.place(0.0, 4100.0, 1280.0, 4900.0),
            image_wrapper: Some(ids.place(80.0, 4200.0, 600.0, 4800.0)),
            image_frame: Some(ids.place(100.0, 4220.0, 580.0, 4780.0)),
            image: Some(ids.place(100.0, 4220.0, 580.0, 4780.0)),
            decoration: Some(ids.place(60.0, 4180.0, 360.0, 4480.0)),
            subtitle: Some(ids.place(680.0, 4250.0, 1200.0, 4280.0)),
            title: Some(ids.place(680.0, 4300.0, 1200.0, 4400.0)),
            quote: Some(ids.place(680.0, 4420.0, 1200.0, 4560.0)),
            info: vec![
                ids.place(680.0, 4580.0, 1200.0, 4620.0),
                ids.place(680.0, 4630.0, 1200.0, 4670.0),
            ],
            button: Some(ids.place(680.0, 4700.0, 880.0, 4750.0)),
        };

        let gallery_root = ids.place(0.0, 4900.0, 1280.0, 5900.0);
        let gallery_header = ids.place(240.0, 4980.0, 1040.0, 5100.0);
        let mut tiles = row(&mut ids, 3, 5150.0, 5450.0);
        tiles.extend(row(&mut ids, 3, 5500.0, 5800.0));
        let gallery = GalleryLayout {
            root: gallery_root,
            header: Some(gallery_header),
            items: tiles
                .into_iter()
                .map(|item| {
                    let r = item.bounds.unwrap_or(Rect::ZERO);
                    GalleryItem {
                        item,
                        image: Some(ids.place(r.x0, r.y0, r.x1, r.y1)),
                        overlay: Some(ids.place(r.x0, r.y0, r.x1, r.y1)),
                        content: Some(ids.place(
                            r.x0 + 20.0,
                            r.y1 - 80.0,
                            r.x1 - 20.0,
                            r.y1 - 20.0,
                        )),
                    }
                })
                .collect(),
        };

        let global = GlobalLayout {
            section_headers: vec![offerings_header],
            card_groups: vec![row(&mut ids, 3, 5950.0, 6150.0)],
            parallax: vec![
                Parallax {
                    background: ids.place(0.0, 1700.0, 1280.0, 2900.0),
                    container: ids.place(0.0, 1700.0, 1280.0, 2900.0),
                },
                Parallax {
                    background: ids.place(0.0, 2900.0, 1280.0, 4100.0),
                    container: ids.place(0.0, 2900.0, 1280.0, 4100.0),
                },
            ],
        };

        Self {
            header: Some(header),
            hero: Some(hero),
            location: Some(location),
            offerings: Some(offerings),
            menu: Some(menu),
            chef: Some(chef),
            gallery: Some(gallery),
            global: Some(global),
        }
    }

    /// Document height of [`RestaurantPage::sample`].
    pub const SAMPLE_HEIGHT: f64 = 6200.0;
    /// Document width of [`RestaurantPage::sample`].
    pub const SAMPLE_WIDTH: f64 = 1280.0;
}

struct Ids(u32);

impl Ids {
    fn place(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Placed {
        let id = ElementId(self.0);
        self.0 += 1;
        Placed::new(id, Rect::new(x0, y0, x1, y1))
    }
}

#[cfg(test)]
#[path = "../tests/unit/page/page.rs"]
mod tests;
