// ── Main window ───────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the main window class and create the top-level window.
//   • Build the menu bar from `Command::ALL`.
//   • Host the tab strip and status bar; paint the gutter and text area.
//   • Run the message loop, routing keys, mouse and commands into `App`.
//
// `WindowState` is boxed and stored in GWLP_USERDATA.  Every handler
// borrows it through `with_state`; no borrow is held across a modal dialog,
// because modal dialogs pump messages back into `wnd_proc`.

#![allow(unsafe_code)]

use windows::{
    core::{w, PCWSTR, PWSTR},
    Win32::{
        Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{
            BeginPaint, CreateFontW, CreateSolidBrush, DeleteObject, EndPaint, FillRect,
            GetDC, GetStockObject, GetTextMetricsW, InvalidateRect, ReleaseDC, SelectObject,
            SetBkMode, SetTextColor, TextOutW, CLEARTYPE_QUALITY, CLIP_DEFAULT_PRECIS,
            DEFAULT_CHARSET, DEFAULT_GUI_FONT, FF_MODERN, FIXED_PITCH, FW_NORMAL, HBRUSH, HDC,
            HFONT, OUT_DEFAULT_PRECIS, PAINTSTRUCT, TEXTMETRICW, TRANSPARENT,
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Controls::{
                InitCommonControlsEx, ICC_BAR_CLASSES, ICC_TAB_CLASSES, INITCOMMONCONTROLSEX,
                NMHDR, SB_SETTEXTW, STATUSCLASSNAMEW, TCIF_TEXT, TCITEMW, TCM_DELETEALLITEMS,
                TCM_GETCURSEL, TCM_INSERTITEMW, TCM_SETCURSEL, TCN_SELCHANGE, WC_TABCONTROLW,
            },
            Input::KeyboardAndMouse::{
                GetKeyState, SetFocus, VK_BACK, VK_CONTROL, VK_DELETE, VK_DOWN, VK_END,
                VK_ESCAPE, VK_HOME, VK_LEFT, VK_NEXT, VK_PRIOR, VK_RETURN, VK_RIGHT, VK_UP,
            },
            WindowsAndMessaging::{
                AppendMenuW, CreateMenu, CreateWindowExW, DefWindowProcW, DestroyWindow,
                DispatchMessageW, GetClientRect, GetMessageW, GetWindowLongPtrW, GetWindowRect,
                IsDialogMessageW, LoadCursorW, LoadIconW, MessageBoxW, MoveWindow,
                PostQuitMessage, RegisterClassExW, SendMessageW, SetMenu, SetWindowLongPtrW,
                SetWindowPos, SetWindowTextW, ShowWindow, TranslateMessage, UpdateWindow,
                CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, GWLP_USERDATA, HMENU, IDC_IBEAM,
                IDI_APPLICATION, MB_ICONERROR, MB_OK, MF_POPUP, MF_SEPARATOR, MF_STRING, MSG,
                SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOZORDER, SW_SHOW, WINDOW_EX_STYLE, WM_CHAR, WM_CLOSE,
                WM_COMMAND, WM_DESTROY, WM_DPICHANGED, WM_ERASEBKGND, WM_KEYDOWN, WM_KEYUP,
                WM_LBUTTONDOWN, WM_MOUSEWHEEL, WM_NOTIFY, WM_PAINT, WM_SETFONT, WM_SIZE,
                WNDCLASSEXW, WS_CHILD, WS_CLIPCHILDREN, WS_CLIPSIBLINGS, WS_OVERLAPPEDWINDOW,
                WS_VISIBLE,
            },
        },
    },
};

use super::{
    dialogs::{self, FindDialog, FindEvent},
    dpi, last_error,
};
use crate::{
    app::App,
    buffer::Buffer,
    config::EditorConfig,
    error::Result,
    ui::{
        commands::{Command, EditKey, Menu, Shortcut, ShortcutKey},
        layout,
    },
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later find) the main window class.
const CLASS_NAME: PCWSTR = w!("NexusMainWindow");

/// Default window size at 96 DPI.
const DEFAULT_WIDTH: i32 = 960;
const DEFAULT_HEIGHT: i32 = 640;

/// Tab strip height at 96 DPI.
const TAB_HEIGHT: i32 = 26;

/// Space between the gutter numbers and the text, at 96 DPI.
const GUTTER_PAD: i32 = 8;

/// Caret width at 96 DPI.
const CARET_WIDTH: i32 = 2;

/// Lines scrolled per wheel notch.
const WHEEL_LINES: isize = 3;
const WHEEL_DELTA: isize = 120;

/// First menu command identifier; see `Command::id`.
const IDM_BASE: usize = 1000;

// ── Window state ──────────────────────────────────────────────────────────────

/// Character cell size of the editor font.
#[derive(Clone, Copy)]
struct Metrics {
    char_w: i32,
    line_h: i32,
}

struct WindowState {
    app: App,
    hwnd_tabs: HWND,
    hwnd_status: HWND,
    font: HFONT,
    metrics: Metrics,
    dpi: u32,
    /// Gutter plus text, in client coordinates.
    text_rect: RECT,
    find: Option<FindDialog>,
    find_msg: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Create the main window with one empty tab and drive the message loop
/// until the user closes the application.
pub(crate) fn run(config: EditorConfig) -> Result<()> {
    let mut app = App::new(config)?;
    app.add_new_tab("", None);

    dpi::init();
    init_common_controls();

    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // valid for the process lifetime.
    let hmodule = unsafe { GetModuleHandleW(None) }?;
    let hinstance = HINSTANCE(hmodule.0);

    register_class(hinstance)?;
    let hwnd = create_window(hinstance)?;
    let state = create_state(hwnd, hinstance, app)?;

    // SAFETY: hwnd is valid; ownership of the box passes to the window and is
    // reclaimed in WM_DESTROY.
    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(state) as isize);
    }
    with_state(hwnd, |s| {
        s.layout(hwnd);
        s.refresh(hwnd);
    });

    // SAFETY: hwnd was just created and is valid.
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = UpdateWindow(hwnd);
    }
    tracing::info!("main window shown");

    message_loop(hwnd)
}

/// Show a modal error dialog with no owner.  Used by `main()` when `run()`
/// fails before or during the message loop.
pub(crate) fn show_error_dialog(message: &str) {
    let msg_wide = dialogs::wide(message);
    // SAFETY: msg_wide is null-terminated and outlives the modal call.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(msg_wide.as_ptr()),
            w!("Nexus \u{2014} Fatal Error"),
            MB_OK | MB_ICONERROR,
        );
    }
}

// ── Creation ──────────────────────────────────────────────────────────────────

fn init_common_controls() {
    let icc = INITCOMMONCONTROLSEX {
        dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
        dwICC: ICC_TAB_CLASSES | ICC_BAR_CLASSES,
    };
    // SAFETY: icc is fully initialised.
    unsafe {
        let _ = InitCommonControlsEx(&icc);
    }
}

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: IDI_APPLICATION and IDC_IBEAM are built-in resources.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }?;
    let cursor = unsafe { LoadCursorW(None, IDC_IBEAM) }?;

    let wndclass = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        // The text area paints its own background.
        hbrBackground: HBRUSH::default(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
        ..Default::default()
    };

    // SAFETY: wndclass is fully initialised with valid handles.
    if unsafe { RegisterClassExW(&wndclass) } == 0 {
        return Err(last_error("RegisterClassExW"));
    }
    Ok(())
}

fn create_window(hinstance: HINSTANCE) -> Result<HWND> {
    // SAFETY: CLASS_NAME was just registered; hinstance is the exe's module.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            w!("Nexus"),
            WS_OVERLAPPEDWINDOW | WS_CLIPCHILDREN,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    }?;

    let menu = build_menu()?;
    // SAFETY: hwnd and menu are valid handles.
    unsafe { SetMenu(hwnd, menu) }?;
    Ok(hwnd)
}

fn create_state(hwnd: HWND, hinstance: HINSTANCE, app: App) -> Result<Box<WindowState>> {
    let dpi = dpi::for_window(hwnd);
    if dpi != dpi::BASE_DPI {
        // SAFETY: hwnd is valid; resize to the scaled default.
        unsafe {
            let _ = SetWindowPos(
                hwnd,
                HWND::default(),
                0,
                0,
                dpi::scale(DEFAULT_WIDTH, dpi),
                dpi::scale(DEFAULT_HEIGHT, dpi),
                SWP_NOZORDER | SWP_NOACTIVATE | SWP_NOMOVE,
            );
        }
    }

    // SAFETY: hwnd is a valid parent; both classes are registered by
    // InitCommonControlsEx.
    let (hwnd_tabs, hwnd_status) = unsafe {
        let tabs = CreateWindowExW(
            WINDOW_EX_STYLE(0),
            WC_TABCONTROLW,
            PCWSTR::null(),
            WS_CHILD | WS_VISIBLE | WS_CLIPSIBLINGS,
            0,
            0,
            0,
            0,
            hwnd,
            HMENU::default(),
            hinstance,
            None,
        )?;
        let status = CreateWindowExW(
            WINDOW_EX_STYLE(0),
            STATUSCLASSNAMEW,
            PCWSTR::null(),
            WS_CHILD | WS_VISIBLE,
            0,
            0,
            0,
            0,
            hwnd,
            HMENU::default(),
            hinstance,
            None,
        )?;
        let gui_font = GetStockObject(DEFAULT_GUI_FONT);
        let _ = SendMessageW(tabs, WM_SETFONT, WPARAM(gui_font.0 as usize), LPARAM(1));
        (tabs, status)
    };

    let font = create_font(app.config(), dpi)?;
    let metrics = measure(hwnd, font);
    let find_msg = dialogs::find_message_id();

    Ok(Box::new(WindowState {
        app,
        hwnd_tabs,
        hwnd_status,
        font,
        metrics,
        dpi,
        text_rect: RECT::default(),
        find: None,
        find_msg,
    }))
}

fn create_font(config: &EditorConfig, dpi: u32) -> Result<HFONT> {
    let face = dialogs::wide(&config.font_face);
    // SAFETY: face is null-terminated and outlives the call.
    let font = unsafe {
        CreateFontW(
            dpi::font_height(config.font_size, dpi),
            0,
            0,
            0,
            FW_NORMAL.0 as i32,
            0,
            0,
            0,
            DEFAULT_CHARSET,
            OUT_DEFAULT_PRECIS,
            CLIP_DEFAULT_PRECIS,
            CLEARTYPE_QUALITY,
            u32::from(FIXED_PITCH.0) | u32::from(FF_MODERN.0),
            PCWSTR(face.as_ptr()),
        )
    };
    if font.is_invalid() {
        return Err(last_error("CreateFontW"));
    }
    Ok(font)
}

/// Cell size of `font` as rendered in `hwnd`.
fn measure(hwnd: HWND, font: HFONT) -> Metrics {
    let mut tm = TEXTMETRICW::default();
    // SAFETY: the DC is released before returning and the previous font
    // restored first.
    unsafe {
        let hdc = GetDC(hwnd);
        let old = SelectObject(hdc, font);
        let _ = GetTextMetricsW(hdc, &mut tm);
        SelectObject(hdc, old);
        ReleaseDC(hwnd, hdc);
    }
    Metrics {
        char_w: tm.tmAveCharWidth.max(1),
        line_h: tm.tmHeight.max(1),
    }
}

// ── Menu construction ─────────────────────────────────────────────────────────

fn build_menu() -> Result<HMENU> {
    // SAFETY: CreateMenu has no preconditions; labels are static strings
    // converted to owned null-terminated buffers that outlive each call.
    unsafe {
        let bar = CreateMenu()?;
        let file = CreateMenu()?;
        let edit = CreateMenu()?;

        for command in Command::ALL {
            let popup = match command.menu() {
                Menu::File => file,
                Menu::Edit => edit,
            };
            if command.separated() {
                AppendMenuW(popup, MF_SEPARATOR, 0, PCWSTR::null())?;
            }
            let label = dialogs::wide(command.label());
            AppendMenuW(popup, MF_STRING, command.id(IDM_BASE), PCWSTR(label.as_ptr()))?;
        }

        // The uIDNewItem parameter for MF_POPUP is the child HMENU cast to usize.
        AppendMenuW(bar, MF_POPUP, file.0 as usize, w!("&File"))?;
        AppendMenuW(bar, MF_POPUP, edit.0 as usize, w!("&Edit"))?;
        Ok(bar)
    }
}

// ── Message loop ──────────────────────────────────────────────────────────────

fn message_loop(hwnd: HWND) -> Result<()> {
    let mut msg = MSG::default();

    loop {
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread.
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };

        match ret.0 {
            -1 => return Err(last_error("GetMessageW")),
            0 => break,
            _ => {
                // The modeless find dialog handles its own keyboard navigation.
                let find = with_state(hwnd, |s| s.find.as_ref().map(FindDialog::hwnd)).flatten();
                // SAFETY: msg was populated by a successful GetMessageW call.
                unsafe {
                    if let Some(dlg) = find {
                        if IsDialogMessageW(dlg, &msg).as_bool() {
                            continue;
                        }
                    }
                    let _ = TranslateMessage(&msg);
                    let _ = DispatchMessageW(&msg);
                }
            }
        }
    }

    Ok(())
}

// ── State access ──────────────────────────────────────────────────────────────

/// Run `f` on the window's state, if attached.
fn with_state<R>(hwnd: HWND, f: impl FnOnce(&mut WindowState) -> R) -> Option<R> {
    // SAFETY: GWLP_USERDATA holds either 0 or the pointer stored by `run`,
    // which stays valid until WM_DESTROY clears it.  Handlers never hold the
    // reference across a call that re-enters `wnd_proc`.
    let state = unsafe { (GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowState).as_mut() }?;
    Some(f(state))
}

/// Show `result`'s error, if any, after the state borrow has ended.
fn report(hwnd: HWND, result: Option<Result<()>>) {
    if let Some(Err(e)) = result {
        dialogs::show_error(hwnd, &e.to_string());
    }
}

impl WindowState {
    /// Place child controls and apply the text-area geometry to every
    /// document.
    fn layout(&mut self, hwnd: HWND) {
        let mut client = RECT::default();
        let mut status = RECT::default();
        let tab_h = dpi::scale(TAB_HEIGHT, self.dpi);
        // SAFETY: all handles are children of (or equal to) the live window.
        unsafe {
            let _ = GetClientRect(hwnd, &mut client);
            let _ = MoveWindow(self.hwnd_tabs, 0, 0, client.right, tab_h, true);
            let _ = SendMessageW(self.hwnd_status, WM_SIZE, WPARAM(0), LPARAM(0));
            let _ = GetWindowRect(self.hwnd_status, &mut status);
        }
        self.text_rect = RECT {
            left: 0,
            top: tab_h,
            right: client.right,
            bottom: (client.bottom - (status.bottom - status.top)).max(tab_h),
        };

        let Metrics { char_w, line_h } = self.metrics;
        let rows = ((self.text_rect.bottom - self.text_rect.top) / line_h).max(0) as usize;
        let text_w = self.text_rect.right - self.text_left();
        let columns = (text_w / char_w).max(1) as usize;
        self.app.resize(rows, line_h, columns);
    }

    /// Width of the line-number gutter.
    fn gutter_width(&self) -> i32 {
        let digits = self.app.active().map_or(2, |d| d.gutter().digits()) as i32;
        (digits + 1) * self.metrics.char_w + dpi::scale(GUTTER_PAD, self.dpi)
    }

    fn text_left(&self) -> i32 {
        self.text_rect.left + self.gutter_width()
    }

    /// Bring title, tab strip and status bar in line with `App`, and repaint.
    fn refresh(&self, hwnd: HWND) {
        let title = dialogs::wide(&self.app.window_title());
        let status = dialogs::wide(&self.app.active().map(|d| d.status_text()).unwrap_or_default());
        // SAFETY: all buffers are null-terminated and outlive their calls;
        // the handles belong to this window.
        unsafe {
            let _ = SetWindowTextW(hwnd, PCWSTR(title.as_ptr()));
            let _ = SendMessageW(self.hwnd_status, SB_SETTEXTW, WPARAM(0), LPARAM(status.as_ptr() as isize));

            let _ = SendMessageW(self.hwnd_tabs, TCM_DELETEALLITEMS, WPARAM(0), LPARAM(0));
            for (i, label) in self.app.tabs().labels().iter().enumerate() {
                let mut text = dialogs::wide(label);
                let item = TCITEMW {
                    mask: TCIF_TEXT,
                    pszText: PWSTR(text.as_mut_ptr()),
                    ..Default::default()
                };
                let _ = SendMessageW(
                    self.hwnd_tabs,
                    TCM_INSERTITEMW,
                    WPARAM(i),
                    LPARAM(&item as *const TCITEMW as isize),
                );
            }
            if let Some(active) = self.app.tabs().active_index() {
                let _ = SendMessageW(self.hwnd_tabs, TCM_SETCURSEL, WPARAM(active), LPARAM(0));
            }
            let _ = InvalidateRect(hwnd, Some(&self.text_rect as *const RECT), false);
        }
    }

    // ── Painting ──────────────────────────────────────────────────────────────

    fn paint(&self, hdc: HDC) {
        let palette = self.app.config().theme.palette();
        let Metrics { char_w, line_h } = self.metrics;
        let top = self.text_rect.top;
        let gutter = RECT {
            right: self.text_rect.left + self.gutter_width(),
            ..self.text_rect
        };
        let text = RECT {
            left: gutter.right,
            ..self.text_rect
        };
        fill(hdc, &gutter, palette.gutter_bg);
        fill(hdc, &text, palette.bg);

        let Some(doc) = self.app.active() else {
            return;
        };
        let theme = self.app.config().theme;

        // SAFETY: hdc is the paint DC from BeginPaint; the previous font is
        // restored before returning.
        unsafe {
            let old = SelectObject(hdc, self.font);
            SetBkMode(hdc, TRANSPARENT);

            let gutter_doc = doc.gutter();
            let digits = gutter_doc.digits();
            SetTextColor(hdc, colorref(palette.gutter_fg));
            for glyph in gutter_doc.glyphs() {
                let number: Vec<u16> = format!("{:>digits$}", glyph.line).encode_utf16().collect();
                let _ = TextOutW(hdc, gutter.left + char_w / 2, top + glyph.y, &number);
            }

            let buffer = doc.buffer();
            for row in layout::visible_rows(buffer) {
                for run in &row.runs {
                    let x = text.left + (run.range.start - row.span.start) as i32 * char_w;
                    let style = run.tag.map(|t| theme.tag_style(t));
                    let chars: Vec<u16> = buffer.slice(run.range.clone()).encode_utf16().collect();
                    if let Some(bg) = style.and_then(|s| s.bg) {
                        let width = (run.range.end - run.range.start) as i32 * char_w;
                        let cell = RECT {
                            left: x,
                            top: top + row.y,
                            right: x + width,
                            bottom: top + row.y + line_h,
                        };
                        fill(hdc, &cell, bg);
                    }
                    SetTextColor(hdc, colorref(style.map_or(palette.fg, |s| s.fg)));
                    let _ = TextOutW(hdc, x, top + row.y, &chars);
                }
            }

            if let Some(caret) = layout::caret(buffer) {
                let x = text.left + caret.column as i32 * char_w;
                let bar = RECT {
                    left: x,
                    top: top + caret.y,
                    right: x + dpi::scale(CARET_WIDTH, self.dpi),
                    bottom: top + caret.y + line_h,
                };
                fill(hdc, &bar, palette.caret);
            }

            SelectObject(hdc, old);
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    fn key_down(&mut self, key: u16, ctrl: bool) -> Option<Command> {
        if key == VK_ESCAPE.0 {
            return Command::for_shortcut(Shortcut { ctrl, key: ShortcutKey::Escape });
        }
        if let Ok(letter @ b'A'..=b'Z') = u8::try_from(key) {
            if let Some(command) =
                Command::for_shortcut(Shortcut { ctrl, key: ShortcutKey::Letter(letter as char) })
            {
                return Some(command);
            }
        }
        if key == VK_RETURN.0 {
            self.app.key_return();
            return None;
        }
        let edit = match key {
            k if k == VK_LEFT.0 => EditKey::Left,
            k if k == VK_RIGHT.0 => EditKey::Right,
            k if k == VK_UP.0 => EditKey::Up,
            k if k == VK_DOWN.0 => EditKey::Down,
            k if k == VK_HOME.0 => EditKey::Home,
            k if k == VK_END.0 => EditKey::End,
            k if k == VK_PRIOR.0 => EditKey::PageUp,
            k if k == VK_NEXT.0 => EditKey::PageDown,
            k if k == VK_BACK.0 => EditKey::Backspace,
            k if k == VK_DELETE.0 => EditKey::Delete,
            _ => return None,
        };
        self.app.edit_key(edit);
        None
    }

    fn click(&mut self, x: i32, y: i32) {
        let left = self.text_left();
        if y < self.text_rect.top || y >= self.text_rect.bottom || x < left {
            return;
        }
        let Metrics { char_w, line_h } = self.metrics;
        let row = ((y - self.text_rect.top) / line_h) as usize;
        let column = ((x - left + char_w / 2) / char_w) as usize;
        self.app.click(row, column);
    }

    fn on_find_event(&mut self, event: FindEvent) -> Result<()> {
        match event {
            FindEvent::Find(query) => self.app.find(&query).map(drop),
            FindEvent::ReplaceAll { query, replacement } => {
                self.app.replace_all(&query, &replacement).map(drop)
            }
            FindEvent::Closed => {
                self.find = None;
                Ok(())
            }
        }
    }

    fn dpi_changed(&mut self, hwnd: HWND, dpi: u32) -> Result<()> {
        let font = create_font(self.app.config(), dpi)?;
        // SAFETY: the old font is no longer selected into any DC.
        unsafe {
            let _ = DeleteObject(self.font);
        }
        self.font = font;
        self.dpi = dpi;
        self.metrics = measure(hwnd, font);
        Ok(())
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn on_command(hwnd: HWND, command: Command) {
    tracing::debug!(?command, "command");
    match command {
        Command::NewTab => {
            with_state(hwnd, |s| {
                s.app.add_new_tab("", None);
                s.layout(hwnd);
            });
        }
        Command::Open => {
            let Some(path) = dialogs::show_open_dialog(hwnd) else {
                return;
            };
            let result = with_state(hwnd, |s| {
                let opened = s.app.open_file(&path).map(drop);
                s.layout(hwnd);
                opened
            });
            report(hwnd, result);
        }
        Command::Save => {
            let default = with_state(hwnd, |s| {
                s.app.active().map(|d| match d.path() {
                    Some(p) => p.display().to_string(),
                    None => d.title().to_owned(),
                })
            })
            .flatten();
            let Some(default) = default else {
                return;
            };
            let Some(path) = dialogs::show_save_dialog(hwnd, &default) else {
                return;
            };
            report(hwnd, with_state(hwnd, |s| s.app.save_active(&path)));
        }
        Command::CloseTab => {
            with_state(hwnd, |s| {
                if let Some(index) = s.app.tabs().active_index() {
                    s.app.close_tab(index);
                }
            });
        }
        Command::Exit => {
            // SAFETY: hwnd is the main window; triggers WM_DESTROY.
            unsafe {
                let _ = DestroyWindow(hwnd);
            }
            return;
        }
        Command::Find => open_find_dialog(hwnd),
        Command::ClearHighlights => {
            with_state(hwnd, |s| s.app.clear_highlights());
        }
        Command::ToggleDarkMode => {
            with_state(hwnd, |s| s.app.toggle_theme());
        }
    }
    with_state(hwnd, |s| s.refresh(hwnd));
}

fn open_find_dialog(hwnd: HWND) {
    let existing = with_state(hwnd, |s| s.find.as_ref().map(FindDialog::hwnd)).flatten();
    if let Some(dlg) = existing {
        // SAFETY: dlg is the live modeless dialog.
        unsafe {
            let _ = SetFocus(dlg);
        }
        return;
    }
    let Some(query) = with_state(hwnd, |s| s.app.last_query().to_owned()) else {
        return;
    };
    match dialogs::show_find_dialog(hwnd, &query) {
        Ok(dialog) => {
            with_state(hwnd, |s| s.find = Some(dialog));
        }
        Err(e) => dialogs::show_error(hwnd, &e.to_string()),
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

fn ctrl_down() -> bool {
    // SAFETY: GetKeyState reads the calling thread's keyboard state.
    unsafe { GetKeyState(i32::from(VK_CONTROL.0)) < 0 }
}

/// Signed x and y packed into an LPARAM.
fn point(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as u16 as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as i32;
    (x, y)
}

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call.
unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        // ── Lifecycle ─────────────────────────────────────────────────────────
        WM_CLOSE => {
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }

        WM_DESTROY => {
            let ptr = SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) as *mut WindowState;
            if !ptr.is_null() {
                // SAFETY: ptr came from Box::into_raw in `run` and was just
                // detached, so nothing else can reach it.
                let state = Box::from_raw(ptr);
                let _ = DeleteObject(state.font);
            }
            tracing::info!("main window closed");
            PostQuitMessage(0);
            LRESULT(0)
        }

        // ── Layout & painting ─────────────────────────────────────────────────
        WM_SIZE => {
            with_state(hwnd, |s| {
                s.layout(hwnd);
                s.refresh(hwnd);
            });
            LRESULT(0)
        }

        WM_DPICHANGED => {
            let dpi = (wparam.0 & 0xFFFF) as u32;
            let suggested = &*(lparam.0 as *const RECT);
            let result = with_state(hwnd, |s| s.dpi_changed(hwnd, dpi));
            let _ = SetWindowPos(
                hwnd,
                HWND::default(),
                suggested.left,
                suggested.top,
                suggested.right - suggested.left,
                suggested.bottom - suggested.top,
                SWP_NOZORDER | SWP_NOACTIVATE,
            );
            report(hwnd, result);
            LRESULT(0)
        }

        WM_ERASEBKGND => LRESULT(1),

        WM_PAINT => {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);
            with_state(hwnd, |s| s.paint(hdc));
            let _ = EndPaint(hwnd, &ps);
            LRESULT(0)
        }

        // ── Keyboard & mouse ──────────────────────────────────────────────────
        WM_KEYDOWN => {
            let command = with_state(hwnd, |s| {
                let command = s.key_down(wparam.0 as u16, ctrl_down());
                s.refresh(hwnd);
                command
            })
            .flatten();
            if let Some(command) = command {
                on_command(hwnd, command);
            }
            LRESULT(0)
        }

        WM_CHAR => {
            let typed = char::from_u32(wparam.0 as u32).filter(|&c| c == '\t' || !c.is_control());
            if let Some(c) = typed.filter(|_| !ctrl_down()) {
                with_state(hwnd, |s| {
                    s.app.type_char(c);
                    s.refresh(hwnd);
                });
            }
            LRESULT(0)
        }

        WM_KEYUP => {
            with_state(hwnd, |s| {
                s.app.key_release();
                s.refresh(hwnd);
            });
            LRESULT(0)
        }

        WM_LBUTTONDOWN => {
            let (x, y) = point(lparam);
            let _ = SetFocus(hwnd);
            with_state(hwnd, |s| {
                s.click(x, y);
                s.refresh(hwnd);
            });
            LRESULT(0)
        }

        WM_MOUSEWHEEL => {
            let delta = ((wparam.0 >> 16) & 0xFFFF) as u16 as i16 as isize;
            with_state(hwnd, |s| {
                s.app.scroll_by(-delta / WHEEL_DELTA * WHEEL_LINES);
                s.refresh(hwnd);
            });
            LRESULT(0)
        }

        // ── Controls & commands ───────────────────────────────────────────────
        WM_NOTIFY => {
            let hdr = &*(lparam.0 as *const NMHDR);
            if hdr.code == TCN_SELCHANGE {
                with_state(hwnd, |s| {
                    if hdr.hwndFrom == s.hwnd_tabs {
                        let index = SendMessageW(s.hwnd_tabs, TCM_GETCURSEL, WPARAM(0), LPARAM(0)).0;
                        if let Ok(index) = usize::try_from(index) {
                            s.app.select_tab(index);
                            s.layout(hwnd);
                        }
                        s.refresh(hwnd);
                    }
                });
                let _ = SetFocus(hwnd);
            }
            LRESULT(0)
        }

        WM_COMMAND => match Command::from_id(wparam.0 & 0xFFFF, IDM_BASE) {
            Some(command) => {
                on_command(hwnd, command);
                LRESULT(0)
            }
            None => DefWindowProcW(hwnd, msg, wparam, lparam),
        },

        _ => {
            let is_find = with_state(hwnd, |s| s.find_msg != 0 && msg == s.find_msg).unwrap_or(false);
            if !is_find {
                return DefWindowProcW(hwnd, msg, wparam, lparam);
            }
            if let Some(event) = dialogs::find_event(lparam) {
                let result = with_state(hwnd, |s| {
                    let result = s.on_find_event(event);
                    s.refresh(hwnd);
                    result
                });
                report(hwnd, result);
            }
            LRESULT(0)
        }
    }
}

// ── GDI helpers ───────────────────────────────────────────────────────────────

fn colorref(c: u32) -> COLORREF {
    COLORREF(c)
}

fn fill(hdc: HDC, rect: &RECT, color: u32) {
    // SAFETY: hdc is a live paint DC; the brush is deleted after use.
    unsafe {
        let brush = CreateSolidBrush(colorref(color));
        FillRect(hdc, rect, brush);
        let _ = DeleteObject(brush);
    }
}
