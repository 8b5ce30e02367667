use shared::MonthKey;
use yew::prelude::*;

/// Single source of truth for which ledger month is being viewed.
///
/// Changing the month does not fetch anything by itself; the data hooks
/// react to the key change through their own keying.
#[derive(Clone, PartialEq)]
pub struct MonthHandle {
    pub month: MonthKey,
    pub set_month: Callback<MonthKey>,
}

impl MonthHandle {
    pub fn go_prev(&self) {
        self.set_month.emit(self.month.prev());
    }

    pub fn go_next(&self) {
        self.set_month.emit(self.month.next());
    }
}

#[derive(Properties, PartialEq)]
pub struct MonthProviderProps {
    #[prop_or_default]
    pub children: Html,
}

#[function_component(MonthProvider)]
pub fn month_provider(props: &MonthProviderProps) -> Html {
    // Defaults to the current calendar month at startup.
    let month = use_state(MonthKey::current);

    let set_month = {
        let month = month.clone();
        use_callback((), move |next: MonthKey, _| month.set(next))
    };

    let handle = MonthHandle {
        month: *month,
        set_month,
    };

    html! {
        <ContextProvider<MonthHandle> context={handle}>
            {props.children.clone()}
        </ContextProvider<MonthHandle>>
    }
}

#[hook]
pub fn use_month() -> MonthHandle {
    use_context::<MonthHandle>().expect("use_month must be called inside MonthProvider")
}
