use yew::prelude::*;

use crate::components::layout::{Header, Sidebar};

#[derive(Properties, PartialEq)]
pub struct MainLayoutProps {
    pub children: Children,
}

#[function_component]
pub fn MainLayout(props: &MainLayoutProps) -> Html {
    html! {
        <div class="min-h-screen bg-neutral-50 dark:bg-neutral-900 text-neutral-900 dark:text-neutral-100">
            <Header />
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8 flex gap-8">
                <Sidebar />
                <main class="flex-1 min-w-0">
                    {for props.children.iter()}
                </main>
            </div>
        </div>
    }
}
