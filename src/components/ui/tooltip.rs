use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::tw_merge;

clx! {Tooltip, div, "inline-block relative whitespace-nowrap transition-all duration-300 ease-in-out group/tooltip"}

/// Side of the trigger the hint appears on. Row controls sit at the right
/// edge of a narrow popup, so hints there open to the left.
#[derive(Clone, Copy, Default, strum::Display, strum::AsRefStr)]
pub enum TooltipPosition {
    #[default]
    Top,
    Left,
}

#[component]
pub fn TooltipContent(
    #[prop(into, optional)] class: String,
    #[prop(default = TooltipPosition::default())] position: TooltipPosition,
    children: Children,
) -> impl IntoView {
    let position_class = match position {
        TooltipPosition::Top => "left-1/2 bottom-full mb-1 -translate-x-1/2",
        TooltipPosition::Left => "top-1/2 right-full mr-1.5 -translate-y-1/2",
    };

    let tooltip_class = tw_merge!(
        "tooltip-text absolute invisible opacity-0 transition-opacity duration-200 pointer-events-none z-50",
        "group-hover/tooltip:visible group-hover/tooltip:opacity-100 group-focus-within/tooltip:visible group-focus-within/tooltip:opacity-100",
        "rounded px-1.5 py-0.5 text-[11px] whitespace-nowrap shadow text-background bg-foreground/90",
        class,
        position_class,
    );

    view! {
        <span data-name="TooltipContent" data-position=position.as_ref().to_string() class=tooltip_class>
            {children()}
        </span>
    }
}
